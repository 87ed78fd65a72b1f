//! Integration tests for the owner-side profile session
//!
//! **Coverage:**
//! - Lazy profile creation, including concurrent first loads
//! - Table fallback to the legacy profile table and memoisation
//! - Replace-all link semantics and dense ordering
//! - Partial theme and profile updates mirrored locally
//! - Unauthenticated mutations never reach the data service
//! - Load failures clear local state

#[path = "support/mod.rs"]
mod support;

use std::sync::Arc;

use linkbio_core::profile::{ProfileLoad, ProfileSession, PublicProfileReader, TableResolver};
use linkbio_domain::{Link, LinkBioError, LogicalEntity, ProfileUpdate, TableConfig, ThemeUpdate};
use serde_json::json;
use support::{ana, seed_ana, FakeIdentityProvider, InMemoryDataService};

fn session(data: &InMemoryDataService, identity: Arc<FakeIdentityProvider>) -> ProfileSession {
    ProfileSession::with_tables(Arc::new(data.clone()), identity, TableConfig::default())
}

fn titles(links: &[Link]) -> Vec<String> {
    links.iter().map(|link| link.title.clone()).collect()
}

fn orders(links: &[Link]) -> Vec<i32> {
    links.iter().map(|link| link.display_order).collect()
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn first_load_creates_profile_from_email() {
    let data = InMemoryDataService::with_default_tables();
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));

    let outcome = session.load().await.expect("load should succeed");

    assert!(outcome.was_created());
    let profile = session.profile().expect("profile should be loaded");
    assert_eq!(profile.username, "ana");
    assert_eq!(profile.owner_id, "user-ana");
    assert!(session.theme().is_none());
    assert!(session.links().is_empty());

    let rows = data.rows("profiles");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_id"], json!("user-ana"));
}

#[tokio::test]
async fn existing_profile_loads_theme_and_ordered_links() {
    let data = InMemoryDataService::with_default_tables();
    data.seed("profiles", support::profile_row("p-ana", "user-ana", "ana"));
    data.seed("theme_settings", support::theme_row("t-ana", "p-ana"));
    data.seed("links", support::link_row("l-c", "p-ana", "C", 2, false));
    data.seed("links", support::link_row("l-a", "p-ana", "A", 0, true));
    data.seed("links", support::link_row("l-b", "p-ana", "B", 1, true));
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));

    let outcome = session.load().await.expect("load should succeed");

    assert!(matches!(outcome, ProfileLoad::Existing(_)));
    assert_eq!(session.theme().map(|t| t.id), Some("t-ana".to_string()));
    let links = session.links();
    assert_eq!(titles(&links), vec!["A", "B", "C"]);
    assert_eq!(orders(&links), vec![0, 1, 2]);
    assert!(!links[2].is_active, "owner view keeps inactive links");
    assert_eq!(data.calls_to("insert"), 0);
}

#[tokio::test]
async fn concurrent_first_loads_create_a_single_profile() {
    let data = InMemoryDataService::with_default_tables().with_unique("profiles", "user_id");
    let first = session(&data, FakeIdentityProvider::signed_in(ana()));
    let second = session(&data, FakeIdentityProvider::signed_in(ana()));

    let (a, b) = futures::join!(first.load(), second.load());
    a.expect("first load should succeed");
    b.expect("second load should succeed");

    assert_eq!(data.rows("profiles").len(), 1);
    assert_eq!(
        first.profile().map(|p| p.id),
        second.profile().map(|p| p.id),
        "both sessions should see the same profile row"
    );
}

#[tokio::test]
async fn repeated_loads_on_one_session_create_a_single_profile() {
    let data = InMemoryDataService::with_default_tables();
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));

    let (a, b) = futures::join!(session.load(), session.load());
    a.expect("load should succeed");
    b.expect("load should succeed");

    assert_eq!(data.rows("profiles").len(), 1);
}

#[tokio::test]
async fn load_without_identity_touches_nothing() {
    let data = InMemoryDataService::with_default_tables();
    let session = session(&data, FakeIdentityProvider::anonymous());

    let outcome = session.load().await.expect("anonymous load should succeed");

    assert_eq!(outcome, ProfileLoad::Unauthenticated);
    assert!(session.snapshot().is_empty());
    assert!(data.calls().is_empty());
}

#[tokio::test]
async fn load_falls_back_to_legacy_profile_table() {
    let data = InMemoryDataService::new()
        .with_table("Perfiles")
        .with_table("theme_settings")
        .with_table("links");
    seed_ana(&data, "Perfiles");
    let resolver = Arc::new(TableResolver::new(TableConfig::default()));
    let session = ProfileSession::new(
        Arc::new(data.clone()),
        FakeIdentityProvider::signed_in(ana()),
        Arc::clone(&resolver),
    );

    session.load().await.expect("load should succeed");
    session.load().await.expect("reload should succeed");

    assert_eq!(session.profile().map(|p| p.id), Some("p-ana".to_string()));
    assert_eq!(resolver.resolved(LogicalEntity::Profile).as_deref(), Some("Perfiles"));
    let probes = data.calls().iter().filter(|call| call.table == "profiles").count();
    assert_eq!(probes, 1, "the missing table should only be probed once per session");
}

#[tokio::test]
async fn load_failure_clears_local_state() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");
    assert!(!session.snapshot().is_empty());

    data.fail("select", "links");
    let err = session.load().await.expect_err("load should fail");

    assert!(matches!(err, LinkBioError::RemoteFailure(_)));
    assert!(session.snapshot().is_empty());
}

#[tokio::test]
async fn load_with_every_profile_table_missing_is_schema_mismatch() {
    let data = InMemoryDataService::new().with_table("theme_settings").with_table("links");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));

    let err = session.load().await.expect_err("load should fail");

    assert!(matches!(err, LinkBioError::SchemaMismatch(msg) if msg.contains("Perfiles")));
}

// ============================================================================
// Links
// ============================================================================

#[tokio::test]
async fn reordering_links_stores_dense_order() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");

    let mut reordered = session.links();
    reordered.reverse();
    session.replace_links(reordered).await.expect("replace should succeed");

    let local = session.links();
    assert_eq!(titles(&local), vec!["B", "A"]);
    assert_eq!(orders(&local), vec![0, 1]);

    let mut remote = data.rows("links");
    remote.sort_by_key(|row| row["display_order"].as_i64());
    let remote_titles: Vec<_> = remote.iter().map(|row| row["title"].clone()).collect();
    assert_eq!(remote_titles, vec![json!("B"), json!("A")]);
    assert_eq!(remote[0]["display_order"], json!(0));
    assert_eq!(remote[1]["display_order"], json!(1));
}

#[tokio::test]
async fn replacing_links_ignores_caller_display_order() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");

    let mut first = Link::new("First", "https://first.example.com");
    first.display_order = 7;
    let mut second = Link::new("Second", "https://second.example.com").inactive();
    second.display_order = 7;
    session.replace_links(vec![first, second]).await.expect("replace should succeed");

    assert_eq!(orders(&session.links()), vec![0, 1]);
    let reloaded = {
        session.load().await.expect("reload should succeed");
        session.links()
    };
    assert_eq!(titles(&reloaded), vec!["First", "Second"]);
    assert_eq!(orders(&reloaded), vec![0, 1]);
    assert!(!reloaded[1].is_active);
}

#[tokio::test]
async fn replacing_with_empty_list_removes_every_link() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");

    session.replace_links(Vec::new()).await.expect("replace should succeed");

    assert!(session.links().is_empty());
    assert!(data.rows("links").is_empty());
}

#[tokio::test]
async fn failed_replace_keeps_previous_links() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");
    let before = session.links();

    data.fail("replace", "links");
    let err = session
        .replace_links(vec![Link::new("New", "https://new.example.com")])
        .await
        .expect_err("replace should fail");

    assert!(matches!(err, LinkBioError::RemoteFailure(_)));
    assert_eq!(session.links(), before);
    assert_eq!(data.rows("links").len(), 2);
}

#[tokio::test]
async fn partial_replace_surfaces_and_keeps_previous_local_links() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");
    let before = session.links();

    data.fail_prune("links");
    let err = session
        .replace_links(vec![Link::new("New", "https://new.example.com")])
        .await
        .expect_err("partial write should be reported");

    assert!(matches!(err, LinkBioError::PartialWriteInconsistency(_)));
    assert_eq!(session.links(), before);
    assert_eq!(data.rows("links").len(), 3, "old and new rows both remain remotely");
}

#[tokio::test]
async fn save_links_stores_trimmed_text() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");

    session
        .save_links(vec![Link::new("  Blog  ", " https://blog.example.com ")])
        .await
        .expect("padded link should be accepted");

    let rows = data.rows("links");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], json!("Blog"));
    assert_eq!(rows[0]["url"], json!("https://blog.example.com"));
    assert_eq!(titles(&session.links()), vec!["Blog"]);
}

#[tokio::test]
async fn save_links_rejects_invalid_links_before_writing() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");

    let err = session
        .save_links(vec![Link::new("Broken", "not a url")])
        .await
        .expect_err("invalid link should be rejected");

    assert!(matches!(err, LinkBioError::InvalidInput(msg) if msg.contains("links[0].url")));
    assert_eq!(data.calls_to("replace"), 0);
}

// ============================================================================
// Theme and profile updates
// ============================================================================

#[tokio::test]
async fn theme_update_changes_only_the_given_field() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");
    let before = session.theme().expect("theme should be loaded");

    let update = ThemeUpdate { bg_color: Some("#000000".into()), ..ThemeUpdate::default() };
    session.save_theme(update).await.expect("theme update should succeed");

    let mut expected = before;
    expected.bg_color = "#000000".into();
    assert_eq!(session.theme(), Some(expected));

    let rows = data.rows("theme_settings");
    assert_eq!(rows[0]["bg_color"], json!("#000000"));
    assert_eq!(rows[0]["button_style"], json!("rounded"));
    assert_eq!(rows[0]["font_family"], json!("Inter"));
}

#[tokio::test]
async fn theme_update_rejects_bad_colors() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");

    let update = ThemeUpdate { text_color: Some("red".into()), ..ThemeUpdate::default() };
    let err = session.save_theme(update).await.expect_err("bad color should be rejected");

    assert!(matches!(err, LinkBioError::InvalidInput(_)));
    assert_eq!(data.calls_to("update"), 0);
}

#[tokio::test]
async fn profile_update_sets_and_clears_fields() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");

    let update = ProfileUpdate {
        title: Some(Some("CTO".into())),
        bio: Some(None),
        ..ProfileUpdate::default()
    };
    session.save_profile(update).await.expect("profile update should succeed");

    let profile = session.profile().expect("profile should be loaded");
    assert_eq!(profile.title.as_deref(), Some("CTO"));
    assert_eq!(profile.bio, None);
    assert_eq!(profile.username, "ana");

    let rows = data.rows("profiles");
    assert_eq!(rows[0]["title"], json!("CTO"));
    assert_eq!(rows[0]["bio"], json!(null));
    assert_eq!(rows[0]["contact_email"], json!("private@example.com"));
}

#[tokio::test]
async fn saved_username_is_trimmed_and_publicly_reachable() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let resolver = Arc::new(TableResolver::new(TableConfig::default()));
    let session = ProfileSession::new(
        Arc::new(data.clone()),
        FakeIdentityProvider::signed_in(ana()),
        Arc::clone(&resolver),
    );
    let public = PublicProfileReader::new(Arc::new(data.clone()), resolver);
    session.load().await.expect("load should succeed");

    let update = ProfileUpdate {
        username: Some("  ana2  ".into()),
        title: Some(Some(" CTO ".into())),
        ..ProfileUpdate::default()
    };
    session.save_profile(update).await.expect("padded username should be accepted");

    assert_eq!(data.rows("profiles")[0]["username"], json!("ana2"));
    assert_eq!(session.profile().map(|p| p.username), Some("ana2".to_string()));

    let view = public.read_public("ana2").await.expect("saved username should be readable");
    assert_eq!(view.profile.username, "ana2");
    assert_eq!(view.profile.title.as_deref(), Some("CTO"));
}

#[tokio::test]
async fn empty_profile_update_sends_nothing() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));
    session.load().await.expect("load should succeed");

    session.update_profile(ProfileUpdate::default()).await.expect("no-op should succeed");

    assert_eq!(data.calls_to("update"), 0);
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn mutations_after_sign_out_are_rejected_without_remote_calls() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let identity = FakeIdentityProvider::signed_in(ana());
    let session = session(&data, Arc::clone(&identity));
    session.load().await.expect("load should succeed");
    let before = session.snapshot();
    let calls_before = data.calls().len();

    identity.sign_out();

    let update = ProfileUpdate { title: Some(Some("Nope".into())), ..ProfileUpdate::default() };
    let err = session.update_profile(update).await.expect_err("should be rejected");
    assert!(err.is_unauthenticated());

    let theme = ThemeUpdate { bg_color: Some("#123456".into()), ..ThemeUpdate::default() };
    let err = session.update_theme(theme).await.expect_err("should be rejected");
    assert!(err.is_unauthenticated());

    let err = session.replace_links(Vec::new()).await.expect_err("should be rejected");
    assert!(err.is_unauthenticated());

    assert_eq!(data.calls().len(), calls_before);
    assert_eq!(session.snapshot(), before);
}

#[tokio::test]
async fn identity_check_failure_counts_as_unauthenticated() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let identity = FakeIdentityProvider::signed_in(ana());
    let session = session(&data, Arc::clone(&identity));
    session.load().await.expect("load should succeed");

    identity.set_failing(true);
    let err = session.replace_links(Vec::new()).await.expect_err("should be rejected");

    assert!(err.is_unauthenticated());
    assert_eq!(data.rows("links").len(), 2);
}

#[tokio::test]
async fn identity_is_checked_before_every_mutation() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let identity = FakeIdentityProvider::signed_in(ana());
    let session = session(&data, Arc::clone(&identity));
    session.load().await.expect("load should succeed");
    let checks = identity.checks();

    session.replace_links(session.links()).await.expect("replace should succeed");
    session
        .update_theme(ThemeUpdate { button_shadow: Some(true), ..ThemeUpdate::default() })
        .await
        .expect("theme update should succeed");

    assert_eq!(identity.checks(), checks + 2);
}

#[tokio::test]
async fn mutations_before_load_report_missing_profile() {
    let data = InMemoryDataService::with_default_tables();
    seed_ana(&data, "profiles");
    let session = session(&data, FakeIdentityProvider::signed_in(ana()));

    let err = session.replace_links(Vec::new()).await.expect_err("nothing loaded yet");

    assert!(err.is_not_found());
    assert_eq!(data.calls_to("replace"), 0);
}
