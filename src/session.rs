use serde::Serialize;

use crate::api::{ApiClient, ApiError};
use crate::models::{LoginResponse, User};
use crate::storage::{KeyValueStore, StorageError};

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "user";

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn display_name(&self) -> &str {
        match self.user.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.user.username,
        }
    }

    pub fn role_label(&self) -> &str {
        role_label(&self.user.role)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(Some(self.token.clone()))
    }
}

pub fn role_label(role: &str) -> &str {
    match role {
        "admin" => "مدير النظام",
        "accountant" => "محاسب",
        "secretary" => "سكرتير",
        "teacher" => "أستاذ",
        other => other,
    }
}

pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// A session survives a reload only when both the token and a readable
    /// user profile are stored.
    pub fn restore(&self) -> Option<Session> {
        let token = self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
        let raw_user = self.store.get(USER_KEY)?;
        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Some(Session { token, user }),
            Err(err) => {
                log::warn!("stored user profile is unreadable: {}", err);
                None
            }
        }
    }

    pub fn establish(&self, response: LoginResponse) -> Result<Session, StorageError> {
        let raw_user = serde_json::to_string(&response.user).map_err(|source| {
            StorageError::Encode {
                key: USER_KEY.to_string(),
                source,
            }
        })?;
        self.store.set(TOKEN_KEY, &response.token)?;
        self.store.set(USER_KEY, &raw_user)?;
        Ok(Session {
            token: response.token,
            user: response.user,
        })
    }

    /// Removes both keys; a key that cannot be removed does not stop the
    /// other one from going.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.store.remove(key) {
                log::warn!("logout left `{}` behind: {}", key, err);
            }
        }
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

pub async fn request_login(username: &str, password: &str) -> Result<LoginResponse, ApiError> {
    ApiClient::default()
        .post("/auth/login", &Credentials { username, password })
        .await
}

pub fn login_error_text(err: &ApiError) -> String {
    match err {
        ApiError::Status { .. } => format!(
            "خطأ في تسجيل الدخول: {}",
            err.server_message().unwrap_or("بيانات الدخول غير صحيحة")
        ),
        _ => "حدث خطأ أثناء الاتصال بالخادم".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    fn login_response(role: &str) -> LoginResponse {
        serde_json::from_value(serde_json::json!({
            "token": "tok-123",
            "user": { "_id": "u1", "username": "karim", "fullName": "Karim B.", "role": role }
        }))
        .unwrap()
    }

    #[test]
    fn login_stores_token_and_user_and_restores_them() {
        let sessions = SessionStore::new(MemoryStore::default());
        let session = sessions.establish(login_response("teacher")).unwrap();

        assert_eq!(session.token, "tok-123");
        assert_eq!(session.role_label(), "أستاذ");
        assert_eq!(session.display_name(), "Karim B.");

        let restored = sessions.restore().expect("session should be restored");
        assert_eq!(restored, session);
        assert_eq!(restored.client(), ApiClient::new(Some("tok-123".to_string())));
    }

    #[test]
    fn logout_clears_both_keys() {
        let store = MemoryStore::default();
        let sessions = SessionStore::new(store);
        sessions.establish(login_response("admin")).unwrap();
        sessions.clear();

        assert!(sessions.restore().is_none());
        assert_eq!(sessions.store.len(), 0);
    }

    /// Refuses to drop the token, as a locked-down browser storage might.
    struct StickyToken(MemoryStore);

    impl KeyValueStore for StickyToken {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            if key == TOKEN_KEY {
                return Err(StorageError::Remove(key.to_string()));
            }
            self.0.remove(key)
        }
    }

    #[test]
    fn failed_token_removal_still_clears_the_user() {
        let sessions = SessionStore::new(StickyToken(MemoryStore::default()));
        sessions.establish(login_response("admin")).unwrap();
        sessions.clear();

        assert_eq!(sessions.store.get(TOKEN_KEY).as_deref(), Some("tok-123"));
        assert_eq!(sessions.store.get(USER_KEY), None);
        assert!(sessions.restore().is_none());
    }

    #[test]
    fn token_without_user_shows_login() {
        let store = MemoryStore::default();
        store.set(TOKEN_KEY, "tok").unwrap();
        let sessions = SessionStore::new(store);
        assert!(sessions.restore().is_none());

        sessions.store.set(USER_KEY, "{not json").unwrap();
        assert!(sessions.restore().is_none());
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let sessions = SessionStore::new(MemoryStore::default());
        let mut response = login_response("secretary");
        response.user.full_name = None;
        let session = sessions.establish(response).unwrap();
        assert_eq!(session.display_name(), "karim");
        assert_eq!(session.role_label(), "سكرتير");
    }

    #[test]
    fn role_labels() {
        assert_eq!(role_label("admin"), "مدير النظام");
        assert_eq!(role_label("accountant"), "محاسب");
        assert_eq!(role_label("janitor"), "janitor");
    }

    #[test]
    fn login_errors_surface_the_server_message() {
        let rejected = ApiError::Status {
            status: 401,
            message: Some("كلمة المرور غير صحيحة".to_string()),
        };
        assert_eq!(
            login_error_text(&rejected),
            "خطأ في تسجيل الدخول: كلمة المرور غير صحيحة"
        );
        assert_eq!(
            login_error_text(&ApiError::Network("down".to_string())),
            "حدث خطأ أثناء الاتصال بالخادم"
        );
    }

    #[test]
    fn rejected_login_without_a_body_still_reads_as_a_login_error() {
        let bare = ApiError::Status {
            status: 401,
            message: None,
        };
        assert_eq!(
            login_error_text(&bare),
            "خطأ في تسجيل الدخول: بيانات الدخول غير صحيحة"
        );
        let unreadable = ApiError::Decode("expected value at line 1".to_string());
        assert_eq!(login_error_text(&unreadable), "حدث خطأ أثناء الاتصال بالخادم");
    }
}
