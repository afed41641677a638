use crate::error::AppError;
use crate::model::{ApiEnvelope, ApiUser, Credentials, Habit, LoginReply, LoginRequest};
use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "https://habitica.com/api/v3";
const API_URL_ENV_VAR: &str = "STREAKCHART_API_URL";
const LOGIN_CLIENT_TAG: &str = "streakchart-cli-login";

/// Thin client for the three remote calls this app makes. Every request is a
/// single blocking attempt with platform-default timeouts; a network blip
/// surfaces directly to the caller.
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url<U: Into<String>>(base_url: U) -> Self {
        Self {
            base_url: base_url.into(),
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn from_env() -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV_VAR)
            && !url.trim().is_empty()
        {
            return Self::with_base_url(url.trim());
        }
        Self::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange a username/password pair for the long-lived id/token pair.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginReply, AppError> {
        let url = format!("{}/user/auth/local/login", self.base_url);
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let result = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .set("x-client", LOGIN_CLIENT_TAG)
            .send_json(&request);

        let body = read_identity_response(result)?;
        parse_envelope(&body, "Invalid credentials")
    }

    /// Verify an existing id/token pair against the identity endpoint.
    pub fn authenticate(&self, credentials: &Credentials) -> Result<ApiUser, AppError> {
        let url = format!("{}/user", self.base_url);

        let result = self
            .agent
            .get(&url)
            .set("Content-Type", "application/json")
            .set("x-api-user", &credentials.user_id)
            .set("x-api-key", &credentials.api_token)
            .call();

        let body = read_identity_response(result)?;
        parse_envelope(&body, "Unknown error")
    }

    /// Fetch the authenticated user's full task list, all types mixed.
    pub fn fetch_tasks(&self, credentials: &Credentials) -> Result<Vec<Habit>, AppError> {
        let url = format!("{}/tasks/user", self.base_url);
        let client_tag = format!("{}-streakchart", credentials.user_id);

        let result = self
            .agent
            .get(&url)
            .set("Content-Type", "application/json")
            .set("x-api-user", &credentials.user_id)
            .set("x-api-key", &credentials.api_token)
            .set("x-client", &client_tag)
            .call();

        let body = match result {
            Ok(response) => response
                .into_string()
                .map_err(|err| AppError::io(err.to_string()))?,
            Err(ureq::Error::Status(code, response)) => {
                let detail = response.into_string().unwrap_or_default();
                if detail.trim().is_empty() {
                    return Err(AppError::api(format!("HTTP {code}")));
                }
                return Err(AppError::api(format!("HTTP {code}: {detail}")));
            }
            Err(err) => return Err(AppError::io(err.to_string())),
        };

        parse_envelope(&body, "Unknown error")
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity calls treat any non-2xx status as bad credentials.
fn read_identity_response(
    result: Result<ureq::Response, ureq::Error>,
) -> Result<String, AppError> {
    match result {
        Ok(response) => response
            .into_string()
            .map_err(|err| AppError::io(err.to_string())),
        Err(ureq::Error::Status(_, _)) => Err(AppError::AuthenticationFailed),
        Err(err) => Err(AppError::io(err.to_string())),
    }
}

fn parse_envelope<T: DeserializeOwned>(body: &str, fallback: &str) -> Result<T, AppError> {
    let envelope: ApiEnvelope<T> =
        serde_json::from_str(body).map_err(|err| AppError::invalid_data(err.to_string()))?;

    if !envelope.success {
        return Err(AppError::api(
            envelope.message.unwrap_or_else(|| fallback.to_string()),
        ));
    }

    envelope
        .data
        .ok_or_else(|| AppError::invalid_data("response envelope has no data"))
}

#[cfg(test)]
mod tests {
    use super::{ApiClient, parse_envelope};
    use crate::error::AppError;
    use crate::model::{Credentials, Habit, LoginReply};
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::JoinHandle;

    fn drain_request(stream: &mut TcpStream) {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];

        let header_end = loop {
            if let Some(pos) = data.windows(4).position(|window| window == b"\r\n\r\n") {
                break pos + 4;
            }
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => data.extend_from_slice(&buf[..n]),
            }
        };

        let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while data.len() < header_end + content_length {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => data.extend_from_slice(&buf[..n]),
            }
        }
    }

    fn stub_server(status: u16, body: &str) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            drain_request(&mut stream);

            let reason = match status {
                200 => "OK",
                401 => "Unauthorized",
                404 => "Not Found",
                _ => "Error",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        });

        (format!("http://{addr}"), handle)
    }

    fn test_credentials() -> Credentials {
        Credentials {
            user_id: "user-1".to_string(),
            api_token: "token-1".to_string(),
        }
    }

    #[test]
    fn parse_envelope_returns_data_on_success() {
        let body = r#"{"success": true, "data": {"id": "user-1", "apiToken": "token-1", "newUser": false}}"#;
        let reply: LoginReply = parse_envelope(body, "Invalid credentials").unwrap();
        assert_eq!(reply.id, "user-1");
        assert_eq!(reply.api_token, "token-1");
    }

    #[test]
    fn parse_envelope_surfaces_service_message() {
        let body = r#"{"success": false, "data": null, "message": "Wrong password."}"#;
        let err = parse_envelope::<LoginReply>(body, "Invalid credentials").unwrap_err();
        assert_eq!(err, AppError::Api("Wrong password.".to_string()));
    }

    #[test]
    fn parse_envelope_falls_back_when_message_missing() {
        let body = r#"{"success": false}"#;
        let err = parse_envelope::<LoginReply>(body, "Invalid credentials").unwrap_err();
        assert_eq!(err, AppError::Api("Invalid credentials".to_string()));
    }

    #[test]
    fn parse_envelope_rejects_garbage() {
        let err = parse_envelope::<LoginReply>("not json", "Unknown error").unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn login_success_decodes_reply() {
        let (base_url, handle) = stub_server(
            200,
            r#"{"success": true, "data": {"id": "user-1", "apiToken": "token-1", "newUser": true}}"#,
        );

        let client = ApiClient::with_base_url(base_url);
        let reply = client.login("ada", "secret").unwrap();
        handle.join().unwrap();

        assert_eq!(reply.id, "user-1");
        assert_eq!(reply.api_token, "token-1");
        assert!(reply.new_user);
    }

    #[test]
    fn login_with_wrong_password_is_auth_failed() {
        let (base_url, handle) = stub_server(
            401,
            r#"{"success": false, "error": "NotAuthorized", "message": "Wrong password."}"#,
        );

        let client = ApiClient::with_base_url(base_url);
        let err = client.login("ada", "wrong").unwrap_err();
        handle.join().unwrap();

        assert_eq!(err, AppError::AuthenticationFailed);
    }

    #[test]
    fn authenticate_with_bad_token_is_auth_failed() {
        let (base_url, handle) = stub_server(401, r#"{"success": false}"#);

        let client = ApiClient::with_base_url(base_url);
        let err = client.authenticate(&test_credentials()).unwrap_err();
        handle.join().unwrap();

        assert_eq!(err, AppError::AuthenticationFailed);
    }

    #[test]
    fn authenticate_success_decodes_user() {
        let (base_url, handle) = stub_server(
            200,
            r#"{"success": true, "data": {"id": "user-1", "auth": {"apiToken": "token-1", "userId": "user-1"}, "profile": {"name": "Ada"}}}"#,
        );

        let client = ApiClient::with_base_url(base_url);
        let user = client.authenticate(&test_credentials()).unwrap();
        handle.join().unwrap();

        assert_eq!(user.id, "user-1");
        assert_eq!(user.profile.name, "Ada");
        assert_eq!(user.auth.user_id, "user-1");
    }

    #[test]
    fn fetch_tasks_decodes_mixed_task_list() {
        let (base_url, handle) = stub_server(
            200,
            r#"{"success": true, "data": [
                {"_id": "d1", "text": "Morning run", "type": "daily", "completed": false, "streak": 3},
                {"_id": "h1", "text": "Drink water", "type": "habit"},
                {"_id": "t1", "text": "File taxes", "type": "todo", "completed": false}
            ]}"#,
        );

        let client = ApiClient::with_base_url(base_url);
        let tasks: Vec<Habit> = client.fetch_tasks(&test_credentials()).unwrap();
        handle.join().unwrap();

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].streak, Some(3));
        assert_eq!(tasks[1].kind, "habit");
    }

    #[test]
    fn fetch_tasks_failure_carries_status_and_body() {
        let (base_url, handle) = stub_server(404, r#"{"success": false, "message": "Not found."}"#);

        let client = ApiClient::with_base_url(base_url);
        let err = client.fetch_tasks(&test_credentials()).unwrap_err();
        handle.join().unwrap();

        match err {
            AppError::Api(message) => {
                assert!(message.starts_with("HTTP 404"));
                assert!(message.contains("Not found."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fetch_tasks_logical_failure_is_api_error() {
        let (base_url, handle) =
            stub_server(200, r#"{"success": false, "message": "Task list unavailable."}"#);

        let client = ApiClient::with_base_url(base_url);
        let err = client.fetch_tasks(&test_credentials()).unwrap_err();
        handle.join().unwrap();

        assert_eq!(err, AppError::Api("Task list unavailable.".to_string()));
    }
}
