use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;

use crate::config::CookieConfig;
use crate::config::Environment;

/// Transport attributes of the session cookie.
///
/// Issuance and removal are built from the same attribute set (name, domain,
/// path, security flags); browsers ignore a removal whose attributes differ.
#[derive(Debug, Clone)]
pub struct SessionCookiePolicy {
    name: String,
    domain: Option<String>,
    secure: bool,
    same_site: SameSite,
    max_age: time::Duration,
}

impl SessionCookiePolicy {
    /// Derive the policy from deployment settings.
    ///
    /// `Secure` is set in production, and whenever the cookie must travel
    /// cross-site (`SameSite=None` is only honoured on secure cookies).
    ///
    /// # Arguments
    /// * `config` - Cookie section of the configuration
    /// * `environment` - Deployment tier
    /// * `token_ttl` - Session token lifetime, mirrored as the cookie max age
    pub fn new(config: &CookieConfig, environment: Environment, token_ttl: chrono::Duration) -> Self {
        let same_site = if config.cross_site {
            SameSite::None
        } else {
            SameSite::Strict
        };

        Self {
            name: config.name.clone(),
            domain: config.domain.clone(),
            secure: environment.is_production() || config.cross_site,
            same_site,
            max_age: time::Duration::seconds(token_ttl.num_seconds()),
        }
    }

    /// Read the session token presented by the client, if any.
    pub fn token<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.name)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
    }

    /// Store `token` in the client's cookie jar.
    pub fn attach(&self, jar: CookieJar, token: String) -> CookieJar {
        let mut cookie = self.base_cookie(token);
        cookie.set_max_age(self.max_age);
        jar.add(cookie)
    }

    /// Remove the session cookie from the client's cookie jar.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        let mut cookie = self.base_cookie(String::new());
        cookie.make_removal();
        jar.add(cookie)
    }

    fn base_cookie(&self, value: String) -> Cookie<'static> {
        let mut builder = Cookie::build((self.name.clone(), value))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .path("/");

        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }

        builder.build()
    }
}
