use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use wirebox::{BuildErrorKind, Container, Dependencies, Disposable, Event, InstantiateErrorKind, ResolveErrorKind, State};

type Journal = Arc<Mutex<Vec<String>>>;

struct Config {
    url: &'static str,
}

struct Pool {
    url: String,
    closed: AtomicBool,
    journal: Journal,
}

impl Disposable for Pool {
    fn dispose(&self) -> impl Future<Output = Result<(), anyhow::Error>> + Send {
        async move {
            tokio::task::yield_now().await;
            self.closed.store(true, Ordering::SeqCst);
            self.journal.lock().push(format!("pool {} closed", self.url));
            Ok(())
        }
    }
}

struct Repository {
    pool: Arc<Pool>,
    journal: Journal,
}

impl Disposable for Repository {
    fn dispose(&self) -> impl Future<Output = Result<(), anyhow::Error>> + Send {
        async move {
            // Released before the pool it was built from
            anyhow::ensure!(!self.pool.closed.load(Ordering::SeqCst), "pool closed before repository");
            self.journal.lock().push("repository closed".to_owned());
            Err::<(), _>(anyhow::anyhow!("repository flush failed"))
        }
    }
}

fn container(journal: &Journal) -> Container {
    let mut container = Container::with_observer({
        let journal = journal.clone();
        move |event: &Event<'_>| {
            if let Event::Built = event {
                journal.lock().push("built".to_owned());
            }
        }
    });

    container
        .register_instance("config", Config { url: "postgres://localhost" })
        .unwrap()
        .register_disposable_factory("repository", &["pool"], {
            let journal = journal.clone();
            move |deps: Dependencies| {
                let journal = journal.clone();
                async move {
                    Ok::<_, InstantiateErrorKind>(Repository {
                        pool: deps.get::<Pool>("pool")?,
                        journal,
                    })
                }
            }
        })
        .unwrap()
        .register_disposable_factory("pool", &["config"], {
            let journal = journal.clone();
            move |deps: Dependencies| {
                let journal = journal.clone();
                async move {
                    let config = deps.get::<Config>("config")?;
                    tokio::task::yield_now().await;
                    journal.lock().push("pool opened".to_owned());
                    Ok::<_, InstantiateErrorKind>(Pool {
                        url: config.url.to_owned(),
                        closed: AtomicBool::new(false),
                        journal,
                    })
                }
            }
        })
        .unwrap();

    container
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lifecycle() {
    let journal = Journal::default();
    let mut container = container(&journal);

    assert!(matches!(container.resolve::<Pool>("pool"), Err(ResolveErrorKind::NotBuilt)));

    container.build().await.unwrap();

    assert_eq!(container.state(), State::Built);
    let repository = container.resolve::<Repository>("repository").unwrap();
    assert!(Arc::ptr_eq(&repository.pool, &container.resolve::<Pool>("pool").unwrap()));

    let resolver = container.snapshot().unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve::<Pool>("pool").unwrap().url.clone() })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap(), "postgres://localhost");
    }

    let report = container.dispose().await;

    assert_eq!(report.failed_keys().map(|key| key.as_str()).collect::<Vec<_>>(), ["repository"]);
    assert_eq!(
        *journal.lock(),
        [
            "pool opened",
            "built",
            "repository closed",
            "pool postgres://localhost closed"
        ]
    );
    assert!(resolver.contains("pool"), "snapshot outlives dispose");
}

#[tokio::test]
async fn test_build_errors_identify_the_registration() {
    let mut container = Container::new();
    container
        .register_factory("a", &["b"], |_: Dependencies| async { Ok::<_, InstantiateErrorKind>(()) })
        .unwrap()
        .register_factory("b", &["c"], |_: Dependencies| async { Ok::<_, InstantiateErrorKind>(()) })
        .unwrap()
        .register_factory("c", &["a"], |_: Dependencies| async { Ok::<_, InstantiateErrorKind>(()) })
        .unwrap();

    let err = container.build().await.unwrap_err();

    assert!(matches!(&err, BuildErrorKind::DependencyCycle { path } if path.len() == 3));
    assert_eq!(err.to_string(), "Dependency cycle detected: a -> b -> c -> a");
    assert_eq!(container.state(), State::Unbuilt);
}
