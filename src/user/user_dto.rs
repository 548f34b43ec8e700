use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePreferencesRequest {
    pub theme: Option<String>,
    #[serde(alias = "highContrast")]
    pub high_contrast: Option<bool>,
    #[serde(alias = "textToSpeech")]
    pub text_to_speech: Option<bool>,
    /// Opt-in for out-of-band reminder delivery; read by the scheduler.
    pub notifications: Option<bool>,
}
