use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: String,
}

impl CreateRecipeRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".into());
        }
        if self.description.trim().is_empty() {
            return Err("Description is required".into());
        }
        if self.category.trim().is_empty() {
            return Err("Category is required".into());
        }
        if self.ingredients.is_empty() {
            return Err("At least one ingredient is required".into());
        }
        if self.steps.is_empty() {
            return Err("At least one step is required".into());
        }
        Ok(())
    }
}

/// Partial update; absent fields keep their current values.
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub steps: Option<Vec<String>>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

const MAX_PAGE_SIZE: i64 = 100;

impl Pagination {
    /// Query-string values go straight into LIMIT/OFFSET, so negatives
    /// and oversized limits are clamped instead of reaching Postgres.
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(0, MAX_PAGE_SIZE), self.offset.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: "Carbonara".into(),
            description: "Roman pasta".into(),
            ingredients: vec!["spaghetti".into(), "guanciale".into(), "eggs".into()],
            steps: vec!["boil".into(), "fry".into(), "toss".into()],
            category: "Pasta".into(),
            tags: vec![],
            image: String::new(),
        }
    }

    #[test]
    fn accepts_complete_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn rejects_blank_title() {
        let mut req = valid_request();
        req.title = "   ".into();
        assert_eq!(req.validate().unwrap_err(), "Title is required");
    }

    #[test]
    fn rejects_empty_ingredients_and_steps() {
        let mut req = valid_request();
        req.ingredients.clear();
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.steps.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn tags_and_image_default_when_absent() {
        let req: CreateRecipeRequest = serde_json::from_value(serde_json::json!({
            "title": "Toast",
            "description": "Bread, but better",
            "ingredients": ["bread"],
            "steps": ["toast it"],
            "category": "Breakfast"
        }))
        .unwrap();
        assert!(req.tags.is_empty());
        assert!(req.image.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);
        assert_eq!(p.clamped(), (20, 0));
    }

    #[test]
    fn pagination_clamps_negative_and_oversized_values() {
        let p: Pagination =
            serde_json::from_value(serde_json::json!({"limit": -5, "offset": -3})).unwrap();
        assert_eq!(p.clamped(), (0, 0));

        let p: Pagination =
            serde_json::from_value(serde_json::json!({"limit": 5000, "offset": 7})).unwrap();
        assert_eq!(p.clamped(), (100, 7));
    }
}
