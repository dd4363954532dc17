//! Conversions from wire records to `zendor_core` types.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use zendor_core::{
    Address, CartItem, Email, MoodBoardItem, OrderSummary, PhoneNumber, Price, Product,
    ProductId, UserId, UserProfile, UserRole, GUEST_USER_NAME,
};

use crate::types::{ProductRecord, ProfileRecord};

/// Placeholder the API stores for unset string fields.
const NONE_SENTINEL: &str = "None";

/// Convert a product record; records without any id are dropped.
pub(crate) fn convert_product(record: ProductRecord) -> Option<Product> {
    let Some(id) = record.mongo_id.or(record.id).filter(|id| !id.is_empty()) else {
        tracing::warn!(name = ?record.name, "Dropping product without id");
        return None;
    };

    let image = record
        .images
        .and_then(|images| images.into_iter().find(|url| !url.is_empty()))
        .or(record.image.filter(|url| !url.is_empty()));

    Some(Product {
        id: ProductId::new(id),
        name: record.name.unwrap_or_default(),
        price: record.price.map(Price::inr),
        sample_cost: record.sample_cost.map(Price::inr),
        image,
        description: record.description.unwrap_or_default(),
        brand: non_blank(record.brand),
        finish: non_blank(record.finish),
        surface: non_blank(record.surface),
        sub_category: non_blank(record.sub_category),
        stock: record.stock,
        tags: record.tags.unwrap_or_default(),
    })
}

/// Convert a page of product records, preserving order.
pub(crate) fn convert_products(records: Vec<ProductRecord>) -> Vec<Product> {
    records.into_iter().filter_map(convert_product).collect()
}

/// Normalise the user document.
///
/// A blank name becomes [`GUEST_USER_NAME`], `"None"` placeholders become
/// absent values and missing collections become empty.
pub(crate) fn convert_profile(record: ProfileRecord) -> UserProfile {
    let phone = record
        .phone
        .and_then(|value| match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .and_then(|s| non_placeholder(Some(s)))
        .and_then(|s| match PhoneNumber::parse(&s) {
            Ok(phone) => Some(phone),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unparseable phone number");
                None
            }
        });

    let email = non_placeholder(record.email).and_then(|s| Email::parse(&s).ok());

    let created_at = record
        .created_at
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|at| at.with_timezone(&Utc));

    let role = match record.role.as_deref() {
        Some(role) if role.eq_ignore_ascii_case("admin") => UserRole::Admin,
        _ => UserRole::Customer,
    };

    UserProfile {
        id: record.mongo_id.filter(|id| !id.is_empty()).map(UserId::new),
        user_name: non_placeholder(record.user_name)
            .unwrap_or_else(|| GUEST_USER_NAME.to_owned()),
        email,
        phone,
        profile_picture: non_placeholder(record.profile_picture),
        created_at,
        role,
        orders: collect_items(record.orders, |id| OrderSummary {
            id: Some(id.into()),
            ..OrderSummary::default()
        }),
        mood_board: collect_items(record.mood_board, |id| MoodBoardItem {
            product_id: Some(id.into()),
            ..MoodBoardItem::default()
        }),
        cart: collect_items(record.cart, |id| CartItem {
            product_id: Some(id.into()),
            quantity: 1,
            ..CartItem::default()
        }),
        billing_address: convert_address(record.billing_address),
        shipping_address: convert_address(record.shipping_address),
    }
}

/// Decode a collection whose entries are either objects or bare ids.
fn collect_items<T: DeserializeOwned>(
    values: Option<Vec<serde_json::Value>>,
    from_id: impl Fn(String) -> T,
) -> Vec<T> {
    values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value {
            serde_json::Value::String(id) => Some(from_id(id)),
            serde_json::Value::Object(_) => serde_json::from_value(value)
                .inspect_err(|e| tracing::debug!(error = %e, "Skipping malformed entry"))
                .ok(),
            _ => None,
        })
        .collect()
}

fn convert_address(value: Option<serde_json::Value>) -> Option<Address> {
    let address: Address = match value? {
        serde_json::Value::String(line) => {
            let line = non_placeholder(Some(line))?;
            Address {
                street: Some(line),
                ..Address::default()
            }
        }
        value @ serde_json::Value::Object(_) => serde_json::from_value(value).ok()?,
        _ => return None,
    };
    (!address.is_empty()).then_some(address)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn non_placeholder(value: Option<String>) -> Option<String> {
    non_blank(value).filter(|s| s != NONE_SENTINEL)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn profile(value: serde_json::Value) -> UserProfile {
        convert_profile(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_product_prefers_mongo_id_and_first_image() {
        let record: ProductRecord = serde_json::from_value(json!({
            "_id": "665f",
            "name": "Oak Natural",
            "price": 4200,
            "sampleCost": 150,
            "images": ["https://cdn/a.jpg", "https://cdn/b.jpg"],
            "image": "https://cdn/legacy.jpg",
            "subCategory": "Matte",
            "tags": ["oak"]
        }))
        .unwrap();

        let product = convert_product(record).unwrap();
        assert_eq!(product.id.as_str(), "665f");
        assert_eq!(product.image.as_deref(), Some("https://cdn/a.jpg"));
        assert_eq!(product.price.unwrap().amount, Decimal::new(4200, 0));
        assert_eq!(product.display_price().unwrap().to_string(), "₹150");
        assert_eq!(product.sub_category.as_deref(), Some("Matte"));
    }

    #[test]
    fn test_product_falls_back_to_single_image_and_plain_id() {
        let record: ProductRecord = serde_json::from_value(json!({
            "id": "p2",
            "name": "Ivy",
            "images": [],
            "image": "https://cdn/ivy.jpg"
        }))
        .unwrap();
        let product = convert_product(record).unwrap();
        assert_eq!(product.id.as_str(), "p2");
        assert_eq!(product.image.as_deref(), Some("https://cdn/ivy.jpg"));
        assert_eq!(product.description, "");
    }

    #[test]
    fn test_products_without_id_are_dropped() {
        let records = vec![
            ProductRecord {
                name: Some("ghost".into()),
                ..ProductRecord::default()
            },
            ProductRecord {
                mongo_id: Some("a".into()),
                ..ProductRecord::default()
            },
        ];
        let products = convert_products(records);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.as_str(), "a");
    }

    #[test]
    fn test_profile_none_placeholders() {
        let profile = profile(json!({
            "_id": "u1",
            "userName": "Asha",
            "email": "asha@example.com",
            "phone": "None",
            "profilePicture": "None",
            "createdAt": "2023-04-05T10:00:00.000Z"
        }));
        assert_eq!(profile.user_name, "Asha");
        assert!(profile.phone.is_none());
        assert!(profile.profile_picture.is_none());
        assert_eq!(profile.member_since(), Some(2023));
        assert_eq!(profile.role, UserRole::Customer);
    }

    #[test]
    fn test_profile_defaults_for_missing_fields() {
        let profile = profile(json!({}));
        assert_eq!(profile.user_name, GUEST_USER_NAME);
        assert!(profile.orders.is_empty());
        assert!(profile.cart.is_empty());
        assert!(profile.mood_board.is_empty());
        assert!(profile.billing_address.is_none());
    }

    #[test]
    fn test_profile_numeric_phone_and_admin_role() {
        let profile = profile(json!({
            "userName": "Ravi",
            "phone": 9876543210_u64,
            "role": "admin"
        }));
        assert_eq!(profile.phone.unwrap().digits(), "9876543210");
        assert_eq!(profile.role, UserRole::Admin);
    }

    #[test]
    fn test_profile_collections_accept_ids_and_objects() {
        let profile = profile(json!({
            "orders": ["o1", {"_id": "o2", "status": "Delivered"}, 7],
            "cart": [{"productId": "p1", "quantity": 3}, "p2"],
            "MoodBoard": [{"_id": "p9", "name": "Teak"}]
        }));
        assert_eq!(profile.orders.len(), 2);
        assert_eq!(profile.orders[1].status.as_deref(), Some("Delivered"));
        assert_eq!(profile.cart_units(), 4);
        assert_eq!(profile.mood_board[0].name.as_deref(), Some("Teak"));
    }

    #[test]
    fn test_empty_address_object_is_absent() {
        let profile = profile(json!({
            "billingAddress": {},
            "shippingAddress": {"city": "Pune", "pincode": "411001"}
        }));
        assert!(profile.billing_address.is_none());
        assert_eq!(profile.shipping_address.unwrap().one_line(), "Pune, 411001");
    }
}
