// In-memory transports for command tests

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use netbench_core::{
    BenchConfig, BenchRunner, RawResponse, Result, Transport, TransportError, TransportFactory,
};

/// Answers every GET with one fixed response and counts calls
#[derive(Clone)]
pub struct StaticTransport {
    status: u16,
    body: &'static str,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get(&self, _path: &str) -> std::result::Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RawResponse::new(self.status, self.body))
    }
}

pub struct StaticFactory(StaticTransport);

impl TransportFactory for StaticFactory {
    type Transport = StaticTransport;

    fn build(&self, _config: &BenchConfig) -> Result<StaticTransport> {
        Ok(self.0.clone())
    }
}

/// Runner whose every request returns `status` with `body`, plus its call counter
pub fn static_runner(status: u16, body: &'static str) -> (BenchRunner<StaticFactory>, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let transport = StaticTransport {
        status,
        body,
        calls: calls.clone(),
    };
    (BenchRunner::new(StaticFactory(transport)), calls)
}
