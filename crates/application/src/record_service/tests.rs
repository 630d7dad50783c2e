use std::sync::Arc;

use clinica_core::{AppError, ClinicId, Role, UserIdentity};
use clinica_domain::{Address, AuditAction, ClientProfile, Permission, PermissionSet, PersonKind};
use uuid::Uuid;

use crate::test_support::{
    FakeAuditRepository, FakeClientRepository, FakeMembershipRepository, identity,
};
use crate::{AuthorizationService, RecordSearch};

use super::ClientService;

struct Fixture {
    service: ClientService,
    clients: Arc<FakeClientRepository>,
    audit: Arc<FakeAuditRepository>,
    clinic_a: UserIdentity,
    clinic_b: UserIdentity,
    unprivileged: UserIdentity,
}

async fn fixture() -> Fixture {
    let memberships = FakeMembershipRepository::default();
    let clinic_a = identity(Role::User, ClinicId::new());
    let clinic_b = identity(Role::Master, ClinicId::new());
    let unprivileged = identity(Role::User, clinic_a.clinic_id());

    memberships
        .insert(
            clinic_a.user_id(),
            clinic_a.clinic_id(),
            PermissionSet::from_iter([Permission::ManageClients]),
        )
        .await;
    memberships
        .insert(
            clinic_b.user_id(),
            clinic_b.clinic_id(),
            PermissionSet::new(),
        )
        .await;
    memberships
        .insert(
            unprivileged.user_id(),
            unprivileged.clinic_id(),
            PermissionSet::from_iter([Permission::ViewDashboard]),
        )
        .await;

    let clients = Arc::new(FakeClientRepository::default());
    let audit = Arc::new(FakeAuditRepository::default());
    let service = ClientService::new(
        AuthorizationService::new(Arc::new(memberships)),
        clients.clone(),
        audit.clone(),
    );

    Fixture {
        service,
        clients,
        audit,
        clinic_a,
        clinic_b,
        unprivileged,
    }
}

fn profile(trade_name: &str) -> ClientProfile {
    ClientProfile {
        trade_name: trade_name.to_owned(),
        person_kind: Some(PersonKind::Legal),
        document: None,
        email: None,
        phone: None,
        mobile: None,
        address: Address::default(),
        active: true,
        notes: None,
        previous_code: None,
    }
}

#[tokio::test]
async fn upsert_creates_record_in_actor_clinic() {
    let fixture = fixture().await;

    let created = fixture
        .service
        .upsert(&fixture.clinic_a, None, profile(" Metalurgica Sul "))
        .await;
    let Ok(created) = created else {
        panic!("client should be created");
    };

    assert_eq!(created.clinic_id, fixture.clinic_a.clinic_id());
    assert_eq!(created.profile.trade_name, "Metalurgica Sul");
}

#[tokio::test]
async fn records_of_other_clinics_are_invisible() {
    let fixture = fixture().await;
    let Ok(created) = fixture
        .service
        .upsert(&fixture.clinic_a, None, profile("Metalurgica Sul"))
        .await
    else {
        panic!("client should be created");
    };

    let read = fixture.service.get(&fixture.clinic_b, created.id).await;
    let update = fixture
        .service
        .upsert(&fixture.clinic_b, Some(created.id), profile("Hijacked"))
        .await;
    let delete = fixture.service.delete(&fixture.clinic_b, created.id).await;
    let listed = fixture
        .service
        .list(&fixture.clinic_b, RecordSearch::first_page(10))
        .await;

    assert!(matches!(read, Err(AppError::NotFound(_))));
    assert!(matches!(update, Err(AppError::NotFound(_))));
    assert!(matches!(delete, Err(AppError::NotFound(_))));
    assert_eq!(listed.map(|page| page.total).ok(), Some(0));

    let stored = fixture.clients.rows.lock().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored.first().map(|row| row.profile.trade_name.as_str()),
        Some("Metalurgica Sul")
    );
}

#[tokio::test]
async fn missing_permission_is_rejected_before_storage() {
    let fixture = fixture().await;

    let result = fixture
        .service
        .upsert(&fixture.unprivileged, None, profile("Metalurgica Sul"))
        .await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
    assert!(fixture.clients.rows.lock().await.is_empty());
}

#[tokio::test]
async fn invalid_profile_is_rejected() {
    let fixture = fixture().await;

    let result = fixture
        .service
        .upsert(&fixture.clinic_a, None, profile("   "))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn delete_appends_audit_event() {
    let fixture = fixture().await;
    let Ok(created) = fixture
        .service
        .upsert(&fixture.clinic_a, None, profile("Metalurgica Sul"))
        .await
    else {
        panic!("client should be created");
    };

    let result = fixture.service.delete(&fixture.clinic_a, created.id).await;
    assert!(result.is_ok());

    let events = fixture.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(
        events.first().map(|event| event.action),
        Some(AuditAction::ClientDeleted)
    );
    assert_eq!(
        events.first().map(|event| event.resource_id.clone()),
        Some(created.id.to_string())
    );
}

#[tokio::test]
async fn list_filters_by_search_term() {
    let fixture = fixture().await;
    for name in ["Metalurgica Sul", "Padaria Central", "Metal Norte"] {
        let created = fixture
            .service
            .upsert(&fixture.clinic_a, None, profile(name))
            .await;
        assert!(created.is_ok());
    }

    let mut search = RecordSearch::first_page(fixture.service.default_page_size());
    search.search = Some("METAL".to_owned());
    let page = fixture.service.list(&fixture.clinic_a, search).await;

    assert_eq!(page.map(|page| page.total).ok(), Some(2));
}

#[tokio::test]
async fn unknown_id_on_update_is_not_found() {
    let fixture = fixture().await;

    let result = fixture
        .service
        .upsert(&fixture.clinic_a, Some(Uuid::new_v4()), profile("Nova"))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
