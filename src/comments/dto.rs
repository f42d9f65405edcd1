use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub text: String,
}

impl CommentBody {
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("Comment text is required".into());
        }
        Ok(())
    }
}
