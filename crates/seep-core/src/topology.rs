//! Process topology: rank, process count, and default thread count.
//!
//! Seep runs one driver per cooperating process. The launcher (mpirun,
//! srun, hydra) tells each process its rank and the world size through
//! environment variables; without a launcher the process is rank 0 of 1.

use crate::error::TopologyError;

/// Rank/size variable pairs understood, in lookup order.
const LAUNCHER_VARS: [(&str, &str); 3] = [
    ("OMPI_COMM_WORLD_RANK", "OMPI_COMM_WORLD_SIZE"),
    ("PMI_RANK", "PMI_SIZE"),
    ("SLURM_PROCID", "SLURM_NTASKS"),
];

/// This process's place in the distributed run.
///
/// Immutable after construction. Rank 0 is the output rank: it alone writes
/// canonical (unsuffixed) files and merges log fragments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessTopology {
    rank: usize,
    size: usize,
    thread_count: usize,
}

impl ProcessTopology {
    /// Upper bound on the default thread count, to avoid oversubscribing
    /// shared cluster nodes.
    pub const MAX_DEFAULT_THREADS: usize = 4;

    /// Environment variable that overrides the default thread count.
    pub const THREAD_OVERRIDE_VAR: &'static str = "OMP_NUM_THREADS";

    /// Discover the topology from the process environment.
    pub fn discover() -> Result<Self, TopologyError> {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::from_lookup(|var| std::env::var(var).ok(), cores)
    }

    /// Discover the topology through an arbitrary variable lookup.
    ///
    /// `cores` is the number of hardware threads available to this process.
    pub fn from_lookup<F>(lookup: F, cores: usize) -> Result<Self, TopologyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (rank, size) = launcher_rank_size(&lookup)?.unwrap_or((0, 1));
        let thread_count = resolve_thread_count(lookup(Self::THREAD_OVERRIDE_VAR), cores);
        let topology = Self::new(rank, size, thread_count)?;
        tracing::debug!(rank, size, thread_count, "process topology discovered");
        Ok(topology)
    }

    /// Build a topology from explicit values.
    ///
    /// A zero `thread_count` is raised to 1.
    pub fn new(rank: usize, size: usize, thread_count: usize) -> Result<Self, TopologyError> {
        if size == 0 {
            return Err(TopologyError::EmptyWorld);
        }
        if rank >= size {
            return Err(TopologyError::RankOutOfRange { rank, size });
        }
        Ok(Self {
            rank,
            size,
            thread_count: thread_count.max(1),
        })
    }

    /// A single-process topology with one thread.
    pub fn serial() -> Self {
        Self {
            rank: 0,
            size: 1,
            thread_count: 1,
        }
    }

    /// This process's rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Total number of cooperating processes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether this process owns canonical output (rank 0).
    pub fn is_output_rank(&self) -> bool {
        self.rank == 0
    }

    /// Whether more than one process takes part in the run.
    pub fn must_distribute(&self) -> bool {
        self.size > 1
    }

    /// Thread count hint for the numeric kernels.
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }
}

fn launcher_rank_size<F>(lookup: &F) -> Result<Option<(usize, usize)>, TopologyError>
where
    F: Fn(&str) -> Option<String>,
{
    for (rank_var, size_var) in LAUNCHER_VARS {
        match (lookup(rank_var), lookup(size_var)) {
            (Some(rank), Some(size)) => {
                let rank = parse_count(rank_var, &rank)?;
                let size = parse_count(size_var, &size)?;
                return Ok(Some((rank, size)));
            }
            (Some(_), None) => {
                return Err(TopologyError::IncompleteLauncherPair {
                    present: rank_var.to_string(),
                    missing: size_var.to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(TopologyError::IncompleteLauncherPair {
                    present: size_var.to_string(),
                    missing: rank_var.to_string(),
                })
            }
            (None, None) => {}
        }
    }
    Ok(None)
}

fn parse_count(var: &str, value: &str) -> Result<usize, TopologyError> {
    value
        .trim()
        .parse()
        .map_err(|_| TopologyError::InvalidLauncherValue {
            var: var.to_string(),
            value: value.to_string(),
        })
}

fn resolve_thread_count(override_value: Option<String>, cores: usize) -> usize {
    let default = cores.clamp(1, ProcessTopology::MAX_DEFAULT_THREADS);
    let Some(value) = override_value else {
        return default;
    };
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            tracing::warn!(
                var = ProcessTopology::THREAD_OVERRIDE_VAR,
                value = %value,
                "ignoring invalid thread count override"
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn no_launcher_is_serial() {
        let t = ProcessTopology::from_lookup(env(&[]), 16).unwrap();
        assert_eq!(t.rank(), 0);
        assert_eq!(t.size(), 1);
        assert!(t.is_output_rank());
        assert!(!t.must_distribute());
    }

    #[test]
    fn default_threads_capped_at_four() {
        let t = ProcessTopology::from_lookup(env(&[]), 64).unwrap();
        assert_eq!(t.thread_count(), 4);
        let t = ProcessTopology::from_lookup(env(&[]), 2).unwrap();
        assert_eq!(t.thread_count(), 2);
    }

    #[test]
    fn thread_override_wins_over_cap() {
        let t = ProcessTopology::from_lookup(env(&[("OMP_NUM_THREADS", "12")]), 64).unwrap();
        assert_eq!(t.thread_count(), 12);
    }

    #[test]
    fn invalid_thread_override_falls_back() {
        let t = ProcessTopology::from_lookup(env(&[("OMP_NUM_THREADS", "0")]), 8).unwrap();
        assert_eq!(t.thread_count(), 4);
        let t = ProcessTopology::from_lookup(env(&[("OMP_NUM_THREADS", "many")]), 3).unwrap();
        assert_eq!(t.thread_count(), 3);
    }

    #[test]
    fn open_mpi_variables_are_read() {
        let t = ProcessTopology::from_lookup(
            env(&[("OMPI_COMM_WORLD_RANK", "2"), ("OMPI_COMM_WORLD_SIZE", "4")]),
            8,
        )
        .unwrap();
        assert_eq!(t.rank(), 2);
        assert!(!t.is_output_rank());
        assert!(t.must_distribute());
    }

    #[test]
    fn slurm_variables_are_read() {
        let t = ProcessTopology::from_lookup(
            env(&[("SLURM_PROCID", "0"), ("SLURM_NTASKS", "3")]),
            8,
        )
        .unwrap();
        assert!(t.is_output_rank());
        assert_eq!(t.size(), 3);
    }

    #[test]
    fn half_a_pair_is_an_error() {
        match ProcessTopology::from_lookup(env(&[("PMI_RANK", "1")]), 1) {
            Err(TopologyError::IncompleteLauncherPair { present, missing }) => {
                assert_eq!(present, "PMI_RANK");
                assert_eq!(missing, "PMI_SIZE");
            }
            other => panic!("expected IncompleteLauncherPair, got {other:?}"),
        }
    }

    #[test]
    fn garbage_rank_is_an_error() {
        match ProcessTopology::from_lookup(env(&[("PMI_RANK", "x"), ("PMI_SIZE", "2")]), 1) {
            Err(TopologyError::InvalidLauncherValue { var, .. }) => assert_eq!(var, "PMI_RANK"),
            other => panic!("expected InvalidLauncherValue, got {other:?}"),
        }
    }

    #[test]
    fn rank_must_be_below_size() {
        match ProcessTopology::new(3, 3, 1) {
            Err(TopologyError::RankOutOfRange { rank: 3, size: 3 }) => {}
            other => panic!("expected RankOutOfRange, got {other:?}"),
        }
        assert_eq!(ProcessTopology::new(0, 0, 1), Err(TopologyError::EmptyWorld));
    }
}
