//! Users and their UI preferences

use serde::{Deserialize, Serialize};

use super::Entity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    #[default]
    Geist,
    Sans,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardRadius {
    #[default]
    Rounded,
    Square,
}

/// Stored user record. `password` holds an Argon2 PHC string.
///
/// Never serialize this to a client; use [`PublicUser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub theme: Theme,
    pub font: Font,
    pub card_radius: CardRadius,
}

impl User {
    /// Avatar URL derived from the display name
    pub fn avatar_for(name: &str) -> String {
        format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", name)
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// User as exposed over the API (no credentials)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub theme: Theme,
    pub font: Font,
    pub card_radius: CardRadius,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            bio: user.bio.clone(),
            theme: user.theme,
            font: user.font,
            card_radius: user.card_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_hides_password() {
        let user = User {
            id: "user-9".into(),
            name: "Zoe".into(),
            email: "zoe@x.com".into(),
            password: "$argon2id$secret".into(),
            avatar: Some(User::avatar_for("Zoe")),
            bio: None,
            theme: Theme::Dark,
            font: Font::default(),
            card_radius: CardRadius::Square,
        };

        let json = serde_json::to_value(PublicUser::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("bio").is_none());
        assert_eq!(json["cardRadius"], "square");
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["avatar"], "https://api.dicebear.com/7.x/avataaars/svg?seed=Zoe");
    }
}
