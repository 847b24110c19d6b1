//! Concurrent derivation scheduler
//!
//! One job per chain; each job derives every vault index for its chain in
//! sequence. Jobs run on a dedicated rayon pool in batches of at most
//! [`MAX_CONCURRENT_CHAINS`]. A batch always runs to completion; if any job
//! in it failed, the error of the earliest failing chain (input order) is
//! returned and later batches never start.

use mpc_recovery_chains::{lookup_chain, ChainInfo};
use mpc_recovery_core::RootKeySet;
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::path::DerivationPath;
use crate::types::{CkdError, DeriveResult};
use crate::{derive_child, into_result};

pub const MAX_CONCURRENT_CHAINS: usize = 20;

/// A chain to derive, as the caller named it.
#[derive(Debug, Clone, Copy)]
pub struct ChainJob<'a> {
    pub name: &'a str,
    pub info: &'static ChainInfo,
}

/// Trim chain names, drop duplicates (case-insensitive, first occurrence
/// wins) and resolve each against the registry.
pub fn resolve_chains<S: AsRef<str>>(chains: &[S]) -> Result<Vec<ChainJob<'_>>, CkdError> {
    let mut jobs: Vec<ChainJob<'_>> = Vec::with_capacity(chains.len());
    for chain in chains {
        let name = chain.as_ref().trim();
        let info = lookup_chain(name)?;
        if jobs.iter().any(|j| j.name.eq_ignore_ascii_case(name)) {
            log::debug!("skipping duplicate chain {}", name);
            continue;
        }
        jobs.push(ChainJob { name, info });
    }
    Ok(jobs)
}

/// Derive every `(vault, chain)` pair, sorted by `(vault_index, chain)`.
pub fn derive_all<S: AsRef<str>>(
    keys: &RootKeySet,
    vault_count: u32,
    chains: &[S],
) -> Result<Vec<DeriveResult>, CkdError> {
    if vault_count < 1 {
        return Err(CkdError::InvalidVaultCount);
    }
    let jobs = resolve_chains(chains)?;
    if jobs.is_empty() {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.len().min(MAX_CONCURRENT_CHAINS))
        .thread_name(|i| format!("ckd-worker-{}", i))
        .build()
        .map_err(|e| CkdError::ThreadPool(e.to_string()))?;

    log::info!(
        "deriving {} chain(s) x {} vault(s)",
        jobs.len(),
        vault_count
    );

    let mut results = run_batches(&pool, &jobs, |job| derive_chain(keys, vault_count, job))?;
    results.sort_by(|a, b| (a.vault_index, &a.chain).cmp(&(b.vault_index, &b.chain)));
    Ok(results)
}

/// All vaults of one chain, vault indices one-based.
fn derive_chain(
    keys: &RootKeySet,
    vault_count: u32,
    job: &ChainJob<'_>,
) -> Result<Vec<DeriveResult>, CkdError> {
    let coin_type = job.info.coin_type;
    (0..vault_count)
        .map(|vault| {
            let path = DerivationPath::asset_wallet(vault, coin_type)?;
            let child = derive_child(keys, &path, coin_type)?;
            Ok(into_result(child, vault + 1, job.name))
        })
        .collect()
}

/// Run `work` over `jobs` in batches of [`MAX_CONCURRENT_CHAINS`].
pub(crate) fn run_batches<T, F>(
    pool: &ThreadPool,
    jobs: &[T],
    work: F,
) -> Result<Vec<DeriveResult>, CkdError>
where
    T: Sync,
    F: Fn(&T) -> Result<Vec<DeriveResult>, CkdError> + Sync,
{
    let batch_count = jobs.len().div_ceil(MAX_CONCURRENT_CHAINS);
    let mut results = Vec::new();

    for (n, batch) in jobs.chunks(MAX_CONCURRENT_CHAINS).enumerate() {
        // collect keeps submission order, so the first Err is the earliest chain
        let outcomes: Vec<Result<Vec<DeriveResult>, CkdError>> =
            pool.install(|| batch.par_iter().map(&work).collect());

        for outcome in outcomes {
            results.extend(outcome?);
        }
        log::debug!("batch {}/{} complete", n + 1, batch_count);
    }

    Ok(results)
}
