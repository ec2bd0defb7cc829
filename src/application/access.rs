use std::sync::Arc;

use crate::domain::client::normalize_email;
use crate::domain::ports::ClientRepository;
use crate::domain::role::{AdminAllowList, AuthEvent, Role};

/// Role and identity for one authentication session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub email: Option<String>,
    pub role: Role,
}

impl SessionContext {
    /// State of a session before its first auth event has been classified.
    /// UIs embedding the router start here and replace it with the result of
    /// [`RoleRouter::on_auth_event`].
    pub fn loading() -> Self {
        Self {
            email: None,
            role: Role::Loading,
        }
    }
}

/// Maps an authenticated email to exactly one role. Nothing is cached:
/// every call looks the identity up again.
#[derive(Clone)]
pub struct RoleRouter {
    admins: AdminAllowList,
    clients: Arc<dyn ClientRepository>,
}

impl RoleRouter {
    pub fn new(admins: AdminAllowList, clients: Arc<dyn ClientRepository>) -> Self {
        Self { admins, clients }
    }

    pub fn classify(&self, email: Option<&str>) -> SessionContext {
        let Some(email) = email.map(normalize_email).filter(|e| !e.is_empty()) else {
            return SessionContext {
                email: None,
                role: Role::Unauthorized,
            };
        };

        if self.admins.contains(&email) {
            return SessionContext {
                email: Some(email),
                role: Role::Admin,
            };
        }

        let role = match self.clients.find_by_email(&email) {
            Ok(Some(client)) => Role::Client(Box::new(client)),
            Ok(None) => Role::Unauthorized,
            Err(e) => {
                log::error!("Client lookup for {} failed: {}", email, e);
                Role::Unauthorized
            }
        };
        SessionContext {
            email: Some(email),
            role,
        }
    }

    /// Re-run classification from scratch for a sign-in or sign-out. Backs
    /// `GET /session`.
    pub fn on_auth_event(&self, event: &AuthEvent) -> SessionContext {
        let session = self.classify(event.email());
        log::info!(
            "Auth state changed: {} -> {}",
            session.email.as_deref().unwrap_or("<signed out>"),
            session.role.name()
        );
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::ClientInput;
    use crate::infrastructure::memory::InMemoryClientRepository;

    fn router() -> (RoleRouter, Arc<InMemoryClientRepository>) {
        let clients = Arc::new(InMemoryClientRepository::default());
        let router = RoleRouter::new(
            AdminAllowList::new(["owner@shop.cz", "sales@shop.cz"]),
            clients.clone(),
        );
        (router, clients)
    }

    fn add_client(repo: &InMemoryClientRepository, email: &str) -> uuid::Uuid {
        repo.create(ClientInput {
            name: "Bistro".to_string(),
            address: "Brno".to_string(),
            vat_id: "CZ1".to_string(),
            phone: "1".to_string(),
            email: email.to_string(),
            notes: None,
        })
        .expect("create client")
        .id
    }

    #[test]
    fn admin_email_is_admin_in_any_case() {
        let (router, _) = router();
        assert_eq!(router.classify(Some("OWNER@Shop.cz")).role, Role::Admin);
        assert_eq!(router.classify(Some("sales@shop.cz")).role, Role::Admin);
    }

    #[test]
    fn admin_wins_over_a_client_record_with_the_same_email() {
        let (router, clients) = router();
        add_client(&clients, "owner@shop.cz");
        assert_eq!(router.classify(Some("owner@shop.cz")).role, Role::Admin);
    }

    #[test]
    fn client_email_yields_client_with_record() {
        let (router, clients) = router();
        let id = add_client(&clients, "bistro@example.cz");
        match router.classify(Some("Bistro@Example.CZ")).role {
            Role::Client(c) => assert_eq!(c.id, id),
            other => panic!("expected client, got {:?}", other),
        }
    }

    #[test]
    fn unknown_or_missing_identity_is_unauthorized() {
        let (router, _) = router();
        assert_eq!(router.classify(Some("stranger@x.cz")).role, Role::Unauthorized);
        assert_eq!(router.classify(None).role, Role::Unauthorized);
        assert_eq!(router.classify(Some("  ")).role, Role::Unauthorized);
    }

    #[test]
    fn every_auth_event_reclassifies() {
        let (router, clients) = router();
        let mut session = SessionContext::loading();
        assert_eq!(session.role, Role::Loading);

        session = router.on_auth_event(&AuthEvent::SignedIn {
            email: "owner@shop.cz".to_string(),
        });
        assert_eq!(session.role, Role::Admin);

        session = router.on_auth_event(&AuthEvent::SignedOut);
        assert_eq!(session.role, Role::Unauthorized);
        assert_eq!(session.email, None);

        // A client record added between sessions is picked up on the next sign-in.
        session = router.on_auth_event(&AuthEvent::SignedIn {
            email: "late@example.cz".to_string(),
        });
        assert_eq!(session.role, Role::Unauthorized);
        add_client(&clients, "late@example.cz");
        session = router.on_auth_event(&AuthEvent::SignedIn {
            email: "late@example.cz".to_string(),
        });
        assert_eq!(session.role.name(), "client");
    }
}
