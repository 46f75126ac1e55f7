use async_trait::async_trait;
use tracing::info;

use crate::config::ProfileDefaults;
use crate::errors::AuthError;
use crate::profile::{avatar_url_for, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub name: String,
    pub email: String,
}

/// Opaque login boundary: whatever sits behind it hands back a profile.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, form: &LoginForm) -> Result<UserProfile, AuthError>;
}

/// Accepts any well-formed login and fills the rest of the profile from
/// configuration.
pub struct LocalAuthenticator {
    defaults: ProfileDefaults,
}

impl LocalAuthenticator {
    pub fn new(defaults: ProfileDefaults) -> Self {
        Self { defaults }
    }

    pub fn default_form(&self) -> LoginForm {
        LoginForm {
            name: self.defaults.name.clone(),
            email: self.defaults.email.clone(),
        }
    }
}

#[async_trait]
impl Authenticator for LocalAuthenticator {
    async fn login(&self, form: &LoginForm) -> Result<UserProfile, AuthError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        let email = form.email.trim();
        let well_formed = email
            .split_once('@')
            .map(|(user, host)| !user.is_empty() && host.contains('.'))
            .unwrap_or(false);
        if !well_formed {
            return Err(AuthError::InvalidEmail(email.to_string()));
        }

        info!(user = %name, "login accepted");
        Ok(UserProfile {
            name: name.to_string(),
            email: email.to_string(),
            country: self.defaults.country.clone(),
            gender: self.defaults.gender.clone(),
            avatar_url: avatar_url_for(name.split_whitespace().next().unwrap_or(name)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> LocalAuthenticator {
        LocalAuthenticator::new(ProfileDefaults::default())
    }

    #[tokio::test]
    async fn test_default_login_matches_configured_profile() {
        let a = auth();
        let p = a.login(&a.default_form()).await.unwrap();
        assert_eq!(p.name, "Alex Creator");
        assert_eq!(p.country, "India");
        assert!(p.avatar_url.contains("seed=Alex&"));
    }

    #[tokio::test]
    async fn test_rejects_blank_name_and_bad_email() {
        let a = auth();
        let blank = LoginForm { name: "  ".into(), email: "a@b.co".into() };
        assert_eq!(a.login(&blank).await, Err(AuthError::MissingName));

        for email in ["", "nobody", "@host.com", "me@localhost"] {
            let form = LoginForm { name: "Sam".into(), email: email.into() };
            assert!(matches!(a.login(&form).await, Err(AuthError::InvalidEmail(_))), "{email}");
        }
    }
}
