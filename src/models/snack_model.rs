use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::serialize_object_id;

use super::media_model::MediaRef;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Snack {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub desc: String,
    pub price: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub snack_type: Option<String>,
    pub image: MediaRef,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct SnackUpdate {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub snack_type: Option<String>,
    pub image: Option<MediaRef>,
}

impl SnackUpdate {
    pub fn apply_to(&self, snack: &mut Snack) {
        if let Some(name) = &self.name {
            snack.name = name.clone();
        }
        if let Some(desc) = &self.desc {
            snack.desc = desc.clone();
        }
        if let Some(price) = self.price {
            snack.price = price;
        }
        if let Some(snack_type) = &self.snack_type {
            snack.snack_type = Some(snack_type.clone());
        }
        if let Some(image) = &self.image {
            snack.image = image.clone();
        }
    }
}
