use std::sync::Arc;

use auth::JwtHandler;
use auth::PasswordHasher;
use auth_service::config::Config;
use auth_service::config::CookieConfig;
use auth_service::config::DatabaseConfig;
use auth_service::config::Environment;
use auth_service::config::JwtConfig;
use auth_service::config::PasswordConfig;
use auth_service::config::ServerConfig;
use auth_service::domain::user::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserRepository;
use reqwest::header::COOKIE;
use reqwest::header::SET_COOKIE;
use serde_json::json;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const COOKIE_NAME: &str = "auth_token";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

pub fn test_config(environment: Environment) -> Config {
    Config {
        environment,
        server: ServerConfig {
            port: 0,
            frontend_url: None,
        },
        database: DatabaseConfig {
            url: "memory://".to_string(),
        },
        jwt: JwtConfig {
            secret: String::from_utf8(JWT_SECRET.to_vec()).unwrap(),
            expires_in: "15m".to_string(),
        },
        cookie: CookieConfig {
            name: COOKIE_NAME.to_string(),
            domain: None,
            cross_site: false,
        },
        password: PasswordConfig::default(),
    }
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config(Environment::Test)).await
    }

    pub async fn spawn_with(config: Config) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let password_hasher =
            PasswordHasher::with_params(8 * 1024, 1, 1).expect("Invalid hasher parameters");
        let auth_service = Arc::new(AuthService::with_password_hasher(
            Arc::clone(&repository),
            password_hasher,
        ));
        let jwt_handler = Arc::new(JwtHandler::new(config.jwt.secret.as_bytes()));

        let router =
            create_router(auth_service, jwt_handler, &config).expect("Failed to build router");

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(config.jwt.secret.as_bytes()),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request carrying the session cookie
    pub fn get_with_session(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path)
            .header(COOKIE, format!("{}={}", COOKIE_NAME, token))
    }

    /// Helper to make POST request carrying the session cookie
    pub fn post_with_session(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path)
            .header(COOKIE, format!("{}={}", COOKIE_NAME, token))
    }

    pub async fn signup(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/signup")
            .json(&json!({
                "name": "Ann",
                "email": email,
                "password": password,
                "role": "USER"
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// The raw `Set-Cookie` header for the session cookie, if the response carries one.
pub fn session_set_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{}=", COOKIE_NAME)))
        .map(str::to_string)
}

/// The session token set by the response.
pub fn session_token(response: &reqwest::Response) -> Option<String> {
    let header = session_set_cookie(response)?;
    let pair = header.split(';').next()?;
    let value = pair.split_once('=')?.1;
    (!value.is_empty()).then(|| value.to_string())
}
