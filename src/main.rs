//! viewmodel-notify demo
//!
//! A contacts ViewModel receives new contacts from worker threads and publishes
//! `contact_added`; the contact list View observes it on the UI thread.
//!
//! Command-line usage:
//!   viewmodel-notify [--workers N] [--contacts M] [--config FILE] [--thread-name NAME] [--verbose]

use anyhow::{ensure, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;
use std::time::Duration;
use viewmodel_notify::{
    payload, DefaultNotificationCenter, NotificationCenter, NotificationObserver,
    NotificationValue, ObserverHandle, UiThread, UiThreadConfig, ViewModelScope,
};

const CONTACT_ADDED: &str = "contact_added";
const CONTACTS_CLEARED: &str = "contacts_cleared";

/// CLI application configuration
#[derive(Parser, Debug)]
#[command(name = "viewmodel-notify", about = "Notification center demo")]
struct DemoConfig {
    /// Number of worker threads publishing contacts
    #[arg(long, default_value_t = 4)]
    workers: usize,
    /// Contacts published by each worker
    #[arg(long, default_value_t = 25)]
    contacts: usize,
    /// JSON file with UI thread settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Name of the UI thread (overrides the config file)
    #[arg(long)]
    thread_name: Option<String>,
    /// Enable debug logging
    #[arg(long)]
    verbose: bool,
}

/// View side: counts contacts and checks it only runs on the UI thread.
struct ContactListView {
    ui_thread: ThreadId,
    rows: AtomicUsize,
    off_thread_calls: AtomicUsize,
}

impl NotificationObserver for ContactListView {
    fn received_notification(&self, name: &str, payload: &[NotificationValue]) {
        if std::thread::current().id() != self.ui_thread {
            self.off_thread_calls.fetch_add(1, Ordering::SeqCst);
        }
        match name {
            CONTACT_ADDED => {
                let contact = payload.first().and_then(NotificationValue::as_text);
                let id = payload.get(1).and_then(NotificationValue::as_int);
                log::trace!("Adding row for {:?} (id {:?})", contact, id);
                self.rows.fetch_add(1, Ordering::SeqCst);
            }
            CONTACTS_CLEARED => self.rows.store(0, Ordering::SeqCst),
            _ => log::warn!("Unexpected notification '{}'", name),
        }
    }
}

/// ViewModel side: owns a scope and republishes contacts for the View.
struct ContactsViewModel {
    scope: ViewModelScope,
}

impl ContactsViewModel {
    fn new(center: Arc<dyn NotificationCenter>) -> Self {
        Self {
            scope: ViewModelScope::new(center),
        }
    }

    fn bind_view(&self, view: ObserverHandle) -> Result<()> {
        self.scope.subscribe(CONTACT_ADDED, view.clone())?;
        self.scope.subscribe(CONTACTS_CLEARED, view)?;
        Ok(())
    }

    fn add_contact(&self, name: String, id: i64) -> Result<()> {
        self.scope.publish(CONTACT_ADDED, payload![name, id])?;
        Ok(())
    }

    fn teardown(&self) {
        self.scope.close();
    }
}

/// Load UI thread settings from the optional config file, then apply CLI overrides
fn ui_thread_config(config: &DemoConfig) -> Result<UiThreadConfig> {
    let mut ui_config = match &config.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            UiThreadConfig::from_json(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => UiThreadConfig::default(),
    };
    if let Some(thread_name) = &config.thread_name {
        ui_config = ui_config.with_thread_name(thread_name.clone());
    }
    Ok(ui_config)
}

fn main() -> Result<()> {
    let config = DemoConfig::parse();

    // Initialize logging
    let mut logger = env_logger::Builder::from_default_env();
    if config.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let ui_config = ui_thread_config(&config)?;
    let thread_name = ui_config.thread_name.clone();
    let ui = Arc::new(UiThread::spawn(ui_config).context("starting UI thread")?);
    let center: Arc<dyn NotificationCenter> =
        Arc::new(DefaultNotificationCenter::new(ui.clone()));

    let view = Arc::new(ContactListView {
        ui_thread: ui.thread_id(),
        rows: AtomicUsize::new(0),
        off_thread_calls: AtomicUsize::new(0),
    });
    let view_model = Arc::new(ContactsViewModel::new(center.clone()));
    view_model.bind_view(ObserverHandle::from(view.clone()))?;

    let workers: Vec<_> = (0..config.workers)
        .map(|worker| {
            let view_model = view_model.clone();
            let contacts = config.contacts;
            std::thread::spawn(move || -> Result<()> {
                for i in 0..contacts {
                    let id = (worker * contacts + i) as i64;
                    view_model.add_contact(format!("contact-{}-{}", worker, i), id)?;
                }
                Ok(())
            })
        })
        .collect();

    for worker in workers {
        worker
            .join()
            .map_err(|_| anyhow::anyhow!("worker thread panicked"))??;
    }

    ui.flush(Duration::from_secs(5))?;
    let rows = view.rows.load(Ordering::SeqCst);
    let off_thread = view.off_thread_calls.load(Ordering::SeqCst);
    println!(
        "{} contacts delivered on '{}' ({} off the UI thread)",
        rows, thread_name, off_thread
    );
    ensure!(off_thread == 0, "observer ran off the UI thread");

    view_model.teardown();
    center.signal(CONTACTS_CLEARED)?;
    ui.flush(Duration::from_secs(5))?;
    println!(
        "after teardown: {} rows (view no longer subscribed)",
        view.rows.load(Ordering::SeqCst)
    );

    ui.shutdown();
    Ok(())
}
