/// The process identity a problem is constructed with.
///
/// Problems hold a `Comm` for their whole lifetime and never mutate it.
/// Execution is always a single logical process; the rank and size are
/// carried so that problems can report which process produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Comm {
    rank: usize,
    size: usize,
}

impl Comm {
    /// The identity of a lone process: rank 0 of 1.
    #[must_use]
    pub const fn solo() -> Self {
        Self { rank: 0, size: 1 }
    }

    /// Creates an identity for `rank` within a group of `size` processes.
    ///
    /// Returns `None` if `size` is zero or `rank` is not less than `size`.
    #[must_use]
    pub fn new(rank: usize, size: usize) -> Option<Self> {
        (rank < size).then_some(Self { rank, size })
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` for rank 0, the process that reports results.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.rank == 0
    }
}

impl Default for Comm {
    fn default() -> Self {
        Self::solo()
    }
}
