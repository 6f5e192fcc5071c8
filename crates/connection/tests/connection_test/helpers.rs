use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{watch, Semaphore};

use awsctx_connection::{ConnectionManager, ProbeError, ValidationProbe};
use awsctx_core::config::ConnectionConfig;
use awsctx_core::CredentialIdentifier;
use awsctx_registry::{InMemoryCredentialRegistry, StaticRegionRegistry};

pub const TIMEOUT: Duration = Duration::from_secs(5);
pub const SETTLE: Duration = Duration::from_millis(100);

/// Validator with per-credential verdicts. Keys are either a credential id or
/// `credential@region` for one exact pair, and the pair key wins. Gated keys
/// keep their call in flight until [`ScriptedProbe::release`].
pub struct ScriptedProbe {
    rejected: Mutex<HashMap<String, String>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    calls: Mutex<Vec<(String, String)>>,
    finished: watch::Sender<usize>,
}

impl ScriptedProbe {
    pub fn new() -> Arc<Self> {
        let (finished, _) = watch::channel(0);
        Arc::new(Self {
            rejected: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            finished,
        })
    }

    pub fn reject(&self, credential_id: &str, reason: &str) {
        self.rejected
            .lock()
            .unwrap()
            .insert(credential_id.to_string(), reason.to_string());
    }

    pub fn gate(&self, credential_id: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(credential_id.to_string(), Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self, credential_id: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(credential_id) {
            gate.add_permits(1);
        }
    }

    /// (region, credential) pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait until `count` calls have returned.
    pub async fn wait_finished(&self, count: usize) {
        let mut rx = self.finished.subscribe();
        tokio::time::timeout(TIMEOUT, rx.wait_for(|n| *n >= count))
            .await
            .expect("probe calls did not finish")
            .unwrap();
    }
}

#[async_trait]
impl ValidationProbe for ScriptedProbe {
    async fn validate(&self, region_id: &str, credential_id: &str) -> Result<(), ProbeError> {
        self.calls
            .lock()
            .unwrap()
            .push((region_id.to_string(), credential_id.to_string()));

        let pair = format!("{credential_id}@{region_id}");
        let gate = {
            let gates = self.gates.lock().unwrap();
            gates.get(&pair).or_else(|| gates.get(credential_id)).cloned()
        };
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|e| ProbeError::Task(e.to_string()))?
                .forget();
        }

        let rejected = self.rejected.lock().unwrap();
        let verdict = match rejected.get(&pair).or_else(|| rejected.get(credential_id)) {
            Some(reason) => Err(ProbeError::Rejected(reason.clone())),
            None => Ok(()),
        };
        drop(rejected);
        self.finished.send_modify(|n| *n += 1);
        verdict
    }

    fn probe_name(&self) -> &str {
        "scripted"
    }
}

pub fn credentials(ids: &[&str]) -> Arc<InMemoryCredentialRegistry> {
    Arc::new(InMemoryCredentialRegistry::with_identifiers(
        ids.iter().map(|id| CredentialIdentifier::new(*id)),
    ))
}

pub fn manager(
    credentials: Arc<InMemoryCredentialRegistry>,
    probe: Arc<ScriptedProbe>,
) -> ConnectionManager {
    ConnectionManager::new(
        credentials,
        Arc::new(StaticRegionRegistry::builtin("us-east-1")),
        probe,
        ConnectionConfig::default(),
    )
}
