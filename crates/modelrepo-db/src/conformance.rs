//! Behavioural suite every `SystemDao` implementation must pass.
//!
//! Each scenario starts by clearing the store, so one DAO can run all of
//! them in sequence. Integration tests call `run_all` per backend; the
//! fixture helpers let them compare listings across backends.

use modelrepo_core::{
    GeoPoint, Location, NewSystem, PageRequest, RepositoryError, Sort, SortField, System,
    SystemDao, SystemUpdate,
};
use uuid::Uuid;

/// Run every scenario against `dao`.
pub async fn run_all(dao: &dyn SystemDao) {
    create_then_find_round_trips(dao).await;
    create_generates_identifier(dao).await;
    create_keeps_optional_fields_absent(dao).await;
    virtual_location_round_trips(dao).await;
    duplicate_identifier_is_rejected(dao).await;
    duplicate_name_is_rejected(dao).await;
    concurrent_creates_with_same_identifier(dao).await;
    find_missing_is_not_found(dao).await;
    find_by_name_matches_exactly(dao).await;
    update_preserves_identity(dao).await;
    update_missing_is_not_found(dao).await;
    update_to_taken_name_is_rejected(dao).await;
    delete_removes_system(dao).await;
    delete_all_reports_count(dao).await;
    paging_visits_every_item_once(dao).await;
    explicit_sort_tie_breaks_on_identifier(dao).await;
}

async fn reset(dao: &dyn SystemDao) {
    dao.delete_all().await.expect("delete_all");
}

fn located(name: &str) -> NewSystem {
    NewSystem::new(name)
        .with_description("Rooftop sensors")
        .with_organization("Hellenic Met Service")
        .with_location(
            Location::named("Athens HQ")
                .with_address("Patission 42")
                .with_geo(GeoPoint::new(37.983_810_7, 23.727_539_4)),
        )
}

pub async fn create_then_find_round_trips(dao: &dyn SystemDao) {
    reset(dao).await;
    let id = Uuid::new_v4();
    let input = located("Weather Station A").with_id(id);

    let created = dao.create(&input).await.expect("create");
    assert_eq!(created.id, id);
    assert_eq!(created.name, input.name);
    assert_eq!(created.description, input.description);
    assert_eq!(created.organization, input.organization);
    assert_eq!(created.location, input.location);
    assert_eq!(created.created_at, created.modified_at);

    let found = dao.find_by_id(id).await.expect("find_by_id");
    assert_eq!(found, created);
}

pub async fn create_generates_identifier(dao: &dyn SystemDao) {
    reset(dao).await;
    let a = dao.create(&NewSystem::new("A")).await.expect("create A");
    let b = dao.create(&NewSystem::new("B")).await.expect("create B");
    assert_ne!(a.id, b.id);
    assert_eq!(dao.find_by_id(a.id).await.expect("find A").name, "A");
}

pub async fn create_keeps_optional_fields_absent(dao: &dyn SystemDao) {
    reset(dao).await;
    let bare = dao.create(&NewSystem::new("Bare")).await.expect("create bare");
    let empty = dao
        .create(&NewSystem::new("Empty location").with_location(Location::default()))
        .await
        .expect("create empty");

    let bare = dao.find_by_id(bare.id).await.expect("find bare");
    assert_eq!(bare.description, None);
    assert_eq!(bare.organization, None);
    assert_eq!(bare.location, None);

    let empty = dao.find_by_id(empty.id).await.expect("find empty");
    assert_eq!(empty.location, Some(Location::default()));
}

pub async fn virtual_location_round_trips(dao: &dyn SystemDao) {
    reset(dao).await;
    let location = Location::named("Inference cluster").with_virtual_location("eu-west-1");
    let created = dao
        .create(&NewSystem::new("Inference API").with_location(location.clone()))
        .await
        .expect("create");

    let found = dao.find_by_id(created.id).await.expect("find");
    assert_eq!(found.location, Some(location));
    assert_eq!(found, created);
}

pub async fn duplicate_identifier_is_rejected(dao: &dyn SystemDao) {
    reset(dao).await;
    let id = Uuid::new_v4();
    let original = dao
        .create(&NewSystem::new("Original").with_id(id))
        .await
        .expect("create");

    let err = dao
        .create(&NewSystem::new("Intruder").with_id(id))
        .await
        .expect_err("duplicate id must fail");
    assert!(matches!(err, RepositoryError::AlreadyExists(_)), "{err:?}");

    assert_eq!(dao.find_by_id(id).await.expect("find"), original);
}

pub async fn duplicate_name_is_rejected(dao: &dyn SystemDao) {
    reset(dao).await;
    dao.create(&NewSystem::new("Gateway")).await.expect("create");

    let err = dao
        .create(&NewSystem::new("Gateway"))
        .await
        .expect_err("duplicate name must fail");
    match err {
        RepositoryError::AlreadyExists(msg) => assert!(msg.contains("'Gateway'"), "{msg}"),
        other => panic!("expected AlreadyExists, got {other:?}"),
    }
}

pub async fn concurrent_creates_with_same_identifier(dao: &dyn SystemDao) {
    reset(dao).await;
    let id = Uuid::new_v4();
    let first = NewSystem::new("Racer 1").with_id(id);
    let second = NewSystem::new("Racer 2").with_id(id);

    let (a, b) = tokio::join!(dao.create(&first), dao.create(&second));

    assert_eq!(
        usize::from(a.is_ok()) + usize::from(b.is_ok()),
        1,
        "exactly one create must win: {a:?} / {b:?}"
    );
    let loser = a.err().or(b.err()).expect("one create must fail");
    assert!(matches!(loser, RepositoryError::AlreadyExists(_)), "{loser:?}");
}

pub async fn find_missing_is_not_found(dao: &dyn SystemDao) {
    reset(dao).await;
    let err = dao
        .find_by_id(Uuid::new_v4())
        .await
        .expect_err("missing id");
    assert!(matches!(err, RepositoryError::NotFound(_)), "{err:?}");

    let err = dao.find_by_name("nobody").await.expect_err("missing name");
    assert!(matches!(err, RepositoryError::NotFound(_)), "{err:?}");
}

pub async fn find_by_name_matches_exactly(dao: &dyn SystemDao) {
    reset(dao).await;
    let created = dao.create(&located("Gateway")).await.expect("create");

    assert_eq!(dao.find_by_name("Gateway").await.expect("find"), created);
    assert!(dao.find_by_name("gateway").await.is_err());
}

pub async fn update_preserves_identity(dao: &dyn SystemDao) {
    reset(dao).await;
    let created = dao.create(&located("Before")).await.expect("create");

    let update = SystemUpdate {
        name: "After".into(),
        description: None,
        organization: Some("Acme".into()),
        location: Some(Location::named("Lab")),
    };
    let first = dao.update(created.id, &update).await.expect("update 1");
    let second = dao.update(created.id, &update).await.expect("update 2");

    assert_eq!(first.id, created.id);
    assert_eq!(first.created_at, created.created_at);
    assert!(first.modified_at > created.modified_at);
    assert!(second.modified_at > first.modified_at);

    let found = dao.find_by_id(created.id).await.expect("find");
    assert_eq!(found, second);
    assert_eq!(found.description, None);
    assert_eq!(found.organization.as_deref(), Some("Acme"));
    assert_eq!(found.location, Some(Location::named("Lab")));
}

pub async fn update_missing_is_not_found(dao: &dyn SystemDao) {
    reset(dao).await;
    let update = SystemUpdate::from(NewSystem::new("Ghost"));
    let err = dao
        .update(Uuid::new_v4(), &update)
        .await
        .expect_err("missing");
    assert!(matches!(err, RepositoryError::NotFound(_)), "{err:?}");
}

pub async fn update_to_taken_name_is_rejected(dao: &dyn SystemDao) {
    reset(dao).await;
    dao.create(&NewSystem::new("Alpha")).await.expect("create alpha");
    let beta = dao.create(&NewSystem::new("Beta")).await.expect("create beta");

    let err = dao
        .update(beta.id, &SystemUpdate::from(NewSystem::new("Alpha")))
        .await
        .expect_err("taken name");
    assert!(matches!(err, RepositoryError::AlreadyExists(_)), "{err:?}");
    assert_eq!(dao.find_by_id(beta.id).await.expect("find beta"), beta);
}

pub async fn delete_removes_system(dao: &dyn SystemDao) {
    reset(dao).await;
    let created = dao.create(&NewSystem::new("Doomed")).await.expect("create");

    dao.delete_by_id(created.id).await.expect("delete");
    let err = dao.find_by_id(created.id).await.expect_err("gone");
    assert!(matches!(err, RepositoryError::NotFound(_)), "{err:?}");

    let err = dao.delete_by_id(created.id).await.expect_err("second delete");
    assert!(matches!(err, RepositoryError::NotFound(_)), "{err:?}");
}

pub async fn delete_all_reports_count(dao: &dyn SystemDao) {
    reset(dao).await;
    for name in ["a", "b", "c"] {
        dao.create(&NewSystem::new(name)).await.expect("create");
    }
    assert_eq!(dao.delete_all().await.expect("delete_all"), 3);
    assert_eq!(dao.delete_all().await.expect("delete_all again"), 0);
}

pub async fn paging_visits_every_item_once(dao: &dyn SystemDao) {
    reset(dao).await;
    let mut expected: Vec<Uuid> = Vec::new();
    for i in 0..7 {
        let created = dao
            .create(&NewSystem::new(format!("System {i}")))
            .await
            .expect("create");
        expected.push(created.id);
    }
    expected.sort_by_key(ToString::to_string);

    let mut seen = Vec::new();
    for page in 0..3 {
        let result = dao
            .find_all(&PageRequest::new(page, 3))
            .await
            .expect("find_all");
        assert_eq!(result.total, 7);
        assert_eq!(result.total_pages(3), 3);
        seen.extend(result.items.into_iter().map(|s| s.id));
    }
    assert_eq!(seen, expected);

    let past_end = dao
        .find_all(&PageRequest::new(3, 3))
        .await
        .expect("find_all past end");
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total, 7);
}

pub async fn explicit_sort_tie_breaks_on_identifier(dao: &dyn SystemDao) {
    reset(dao).await;
    let fixture = seed_fixture(dao).await;

    let by_name = listing(dao, Some(Sort::desc(SortField::Name))).await;
    let mut expected = fixture.clone();
    expected.sort_by(|a, b| b.name.cmp(&a.name));
    assert_eq!(by_name, ids(&expected));

    // Timestamps tie when the clock is frozen; order then falls back to id.
    let by_created = listing(dao, Some(Sort::asc(SortField::CreatedAt))).await;
    let mut expected = fixture;
    expected.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
    });
    assert_eq!(by_created, ids(&expected));
}

/// Insert a fixed set of systems with known identifiers.
pub async fn seed_fixture(dao: &dyn SystemDao) -> Vec<System> {
    let names = ["delta", "Alpha", "charlie", "Bravo", "echo", "alpha-2"];
    let mut created = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let id = Uuid::from_u128(0x1000 + (names.len() - i) as u128);
        created.push(
            dao.create(&NewSystem::new(*name).with_id(id))
                .await
                .expect("seed"),
        );
    }
    created
}

/// Identifiers of every system in the order `find_all` lists them.
pub async fn listing(dao: &dyn SystemDao, sort: Option<Sort>) -> Vec<Uuid> {
    let mut request = PageRequest::new(0, 100);
    request.sort = sort;
    let page = dao.find_all(&request).await.expect("find_all");
    page.items.iter().map(|s| s.id).collect()
}

fn ids(systems: &[System]) -> Vec<Uuid> {
    systems.iter().map(|s| s.id).collect()
}
