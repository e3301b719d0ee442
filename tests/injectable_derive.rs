use nestlet::{Container, Injectable, Lifecycle, Token};
use std::sync::Arc;

#[derive(Injectable)]
pub struct Logger {
    #[inject(skip)]
    id: usize,
}

impl Logger {
    fn id(&self) -> usize {
        self.id
    }
}

#[derive(Injectable)]
pub struct Database;

#[derive(Injectable)]
pub struct Repo {
    db: Arc<Database>,
}

#[derive(Injectable)]
pub struct Service {
    #[inject(token = "DB_TOKEN")]
    db: Arc<Database>,
}

#[derive(Injectable)]
#[injectable(lifecycle = "transient")]
pub struct RequestId;

pub struct Settings {
    retries: u32,
}

#[derive(Injectable)]
pub struct Client {
    #[inject(value)]
    settings: Arc<Settings>,
    #[inject(token_expr = Token::named("BASE_URL"))]
    base_url: Arc<String>,
}

pub trait Notifier: Send + Sync {
    fn channel(&self) -> &'static str;
}

#[derive(Injectable)]
pub struct EmailNotifier;

impl Notifier for EmailNotifier {
    fn channel(&self) -> &'static str {
        "email"
    }
}

#[derive(Injectable)]
pub struct Alerts {
    notifier: Arc<dyn Notifier>,
}

#[test]
fn scenario_a_singleton_until_clear() {
    nestlet_testing::init_tracing();
    let container = Container::new();
    container.register_type::<Logger>();

    let first = container.resolve::<Logger>().unwrap();
    let second = container.resolve::<Logger>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.id(), 0);

    container.clear();
    let third = container.resolve::<Logger>().unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
}

#[test]
fn scenario_b_registered_instance_is_injected() {
    let container = Container::new();
    container.register_instance(Token::of::<Database>(), Database);
    container.register_type::<Repo>();

    let database = container.resolve::<Database>().unwrap();
    let repo = container.resolve::<Repo>().unwrap();
    assert!(Arc::ptr_eq(&repo.db, &database));
}

#[test]
fn scenario_c_explicit_token_wins() {
    let container = Container::new();
    container.register_instance("DB_TOKEN", Database);
    container.register_type::<Service>();

    let fake = container.get::<Database>("DB_TOKEN").unwrap();
    let service = container.resolve::<Service>().unwrap();
    assert!(Arc::ptr_eq(&service.db, &fake));
}

#[test]
fn derived_metadata_matches_fields() {
    let metadata = Repo::dependencies();
    assert_eq!(metadata.len(), 1);
    assert_eq!(
        metadata.get(0).unwrap().effective(),
        Some(&Token::of::<Database>())
    );

    let service = Service::dependencies();
    assert_eq!(service.get(0).unwrap().effective(), Some(&Token::named("DB_TOKEN")));

    assert!(Logger::dependencies().is_empty());
    assert_eq!(Logger::lifecycle(), None);
    assert_eq!(RequestId::lifecycle(), Some(Lifecycle::Transient));
}

#[test]
fn declared_transient_lifecycle_applies() {
    let container = Container::new();
    container.register_type::<RequestId>();

    let first = container.resolve::<RequestId>().unwrap();
    let second = container.resolve::<RequestId>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn value_and_expression_tokens() {
    let container = Container::new();
    container.register_instance(Token::of_type::<Settings>(), Settings { retries: 3 });
    container.register_instance("BASE_URL", String::from("https://api.example.com"));
    container.register_type::<Client>();

    let client = container.resolve::<Client>().unwrap();
    assert_eq!(client.settings.retries, 3);
    assert_eq!(client.base_url.as_str(), "https://api.example.com");
}

#[test]
fn trait_object_dependency() {
    let container = Container::new();
    container.register_type::<EmailNotifier>();
    container.register_with(
        Token::of_type::<dyn Notifier>(),
        nestlet::ProviderConfig::new().use_factory(|c: &Container| {
            let notifier: Arc<dyn Notifier> = c.resolve::<EmailNotifier>()?;
            Ok(notifier)
        }),
    );
    container.register_type::<Alerts>();

    let alerts = container.resolve::<Alerts>().unwrap();
    assert_eq!(alerts.notifier.channel(), "email");
}
