use serde::{Deserialize, Serialize};

use super::repo::Rating;

#[derive(Debug, Deserialize)]
pub struct RateRecipeRequest {
    pub rating: i32,
    pub review: Option<String>,
}

impl RateRecipeRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.rating) {
            return Err("Rating must be an integer between 1 and 5".into());
        }
        Ok(())
    }
}

/// The stored rating plus a partial-failure signal: `average_refreshed`
/// is false when the rating row was persisted but the recipe's cached
/// average could not be recomputed.
#[derive(Debug, Serialize)]
pub struct RateRecipeResponse {
    #[serde(flatten)]
    pub rating: Rating,
    pub average_refreshed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[test]
    fn validate_accepts_full_range() {
        for value in 1..=5 {
            let req = RateRecipeRequest {
                rating: value,
                review: None,
            };
            assert!(req.validate().is_ok(), "value {value} should be valid");
        }
    }

    #[test]
    fn validate_rejects_out_of_range() {
        for value in [0, 6, -1, 100] {
            let req = RateRecipeRequest {
                rating: value,
                review: None,
            };
            assert!(req.validate().is_err(), "value {value} should be rejected");
        }
    }

    #[test]
    fn response_flattens_rating_and_carries_signal() {
        let response = RateRecipeResponse {
            rating: Rating {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                recipe_id: Uuid::new_v4(),
                rating: 4,
                reviews: json!([]),
                created_at: OffsetDateTime::now_utc(),
            },
            average_refreshed: true,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["rating"], 4);
        assert_eq!(value["average_refreshed"], true);
        assert!(value["recipe_id"].as_str().is_some());
    }
}
