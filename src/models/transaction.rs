use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::utils::money::round_half_up;

pub const STATUS_PAID: &str = "paid";
pub const STATUS_WAITING_PAYMENT: &str = "waiting_payment";

/// Typed view over a gateway transaction record.
///
/// The raw JSON is what the browser receives; this struct only exists so the
/// order mapper can read the handful of fields it needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub status: String,
    pub created_at: String,
    #[serde(default)]
    pub paid_at: Option<String>,
    pub customer: Customer,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub fee: Option<Fee>,
}

impl Transaction {
    pub fn is_paid(&self) -> bool {
        self.status == STATUS_PAID
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    // campos extras são repassados ao gateway sem alteração
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Customer {
    pub fn document_number(&self) -> String {
        self.document
            .as_ref()
            .map(|doc| doc.number.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(deserialize_with = "string_or_number")]
    pub number: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    // repassados ao gateway como vieram; o gateway valida preço e quantidade
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn unit_price_cents(&self) -> i64 {
        whole(self.unit_price.as_ref())
    }

    pub fn quantity_count(&self) -> i64 {
        whole(self.quantity.as_ref())
    }
}

fn whole(value: Option<&Number>) -> i64 {
    match value {
        Some(n) => n
            .as_i64()
            .unwrap_or_else(|| n.as_f64().map(round_half_up).unwrap_or(0)),
        None => 0,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    #[serde(default)]
    pub fixed_amount: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// Gateways are not consistent about numeric vs string ids.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

pub fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_accepts_numeric_id() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": 4821,
            "amount": 1000,
            "status": "waiting_payment",
            "createdAt": "2024-01-15T10:30:00.000Z",
            "customer": {
                "name": "Maria Silva",
                "email": "maria@example.com",
                "document": { "number": "12345678909", "type": "cpf" }
            },
            "items": [{ "title": "Curso", "unitPrice": 1000, "quantity": 1, "tangible": false }]
        }))
        .unwrap();

        assert_eq!(tx.id, "4821");
        assert!(!tx.is_paid());
        assert!(tx.fee.is_none());
        assert_eq!(tx.customer.document_number(), "12345678909");
        assert_eq!(tx.items[0].extra.get("tangible"), Some(&json!(false)));
    }

    #[test]
    fn test_item_prices_tolerate_missing_and_fractional_values() {
        let items: Vec<Item> = serde_json::from_value(json!([
            { "title": "Brinde" },
            { "title": "Curso", "unitPrice": 1990.5, "quantity": 2.0 }
        ]))
        .unwrap();

        assert_eq!(items[0].unit_price_cents(), 0);
        assert_eq!(items[0].quantity_count(), 0);
        assert_eq!(items[1].unit_price_cents(), 1991);
        assert_eq!(items[1].quantity_count(), 2);

        // reenviado ao gateway exatamente como chegou
        let value = serde_json::to_value(&items).unwrap();
        assert!(value[0].get("unitPrice").is_none());
        assert_eq!(value[1]["unitPrice"], json!(1990.5));
    }

    #[test]
    fn test_customer_keeps_unknown_fields_on_reserialize() {
        let customer: Customer = serde_json::from_value(json!({
            "name": "João",
            "email": "joao@example.com",
            "document": { "number": "123", "type": "cpf" },
            "address": { "city": "Recife" }
        }))
        .unwrap();

        let value = serde_json::to_value(&customer).unwrap();
        assert_eq!(value["address"]["city"], "Recife");
        assert_eq!(value["document"]["type"], "cpf");
        assert!(value.get("phone").is_none());
    }
}
