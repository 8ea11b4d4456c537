//! Mutable view of a snapshot during a sync pass.

use plman_core::FileIdentity;
use plman_scan::DirectorySnapshot;

/// The files of a snapshot that no playlist entry has claimed yet.
///
/// Claiming is a constant-time index lookup, and the unclaimed files keep
/// the snapshot's scan order.
pub(crate) struct WorkingSet<'a> {
    snapshot: &'a DirectorySnapshot,
    claimed: Vec<bool>,
    remaining: usize,
}

impl<'a> WorkingSet<'a> {
    pub(crate) fn new(snapshot: &'a DirectorySnapshot) -> Self {
        Self {
            snapshot,
            claimed: vec![false; snapshot.len()],
            remaining: snapshot.len(),
        }
    }

    /// Claim a file for an existing entry.
    ///
    /// Returns `false` if the file is not in the snapshot or another entry
    /// already claimed it.
    pub(crate) fn claim(&mut self, identity: &FileIdentity) -> bool {
        match self.snapshot.index_of(identity) {
            Some(idx) if !self.claimed[idx] => {
                self.claimed[idx] = true;
                self.remaining -= 1;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    /// Unclaimed files, in scan order.
    ///
    /// The walk stops at the last unclaimed file instead of visiting the
    /// rest of the snapshot.
    pub(crate) fn unclaimed(&self) -> impl Iterator<Item = &'a FileIdentity> + '_ {
        self.snapshot
            .iter()
            .zip(&self.claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(file, _)| file)
            .take(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_once() {
        let snapshot = DirectorySnapshot::from_files("/m", ["/m/a.mp3", "/m/b.mp3"]);
        let mut set = WorkingSet::new(&snapshot);
        let a = FileIdentity::from("/m/a.mp3");

        assert!(set.claim(&a));
        assert!(!set.claim(&a));
        assert!(!set.claim(&FileIdentity::from("/m/gone.mp3")));
        assert_eq!(set.remaining(), 1);
    }

    #[test]
    fn test_unclaimed_keeps_scan_order() {
        let snapshot =
            DirectorySnapshot::from_files("/m", ["/m/c.mp3", "/m/a.mp3", "/m/d.mp3", "/m/b.mp3"]);
        let mut set = WorkingSet::new(&snapshot);
        set.claim(&FileIdentity::from("/m/a.mp3"));

        let rest: Vec<&str> = set.unclaimed().map(|f| f.as_str()).collect();
        assert_eq!(rest, vec!["/m/c.mp3", "/m/d.mp3", "/m/b.mp3"]);
    }

    #[test]
    fn test_unclaimed_bounded_by_remaining() {
        let snapshot =
            DirectorySnapshot::from_files("/m", ["/m/a.mp3", "/m/b.mp3", "/m/c.mp3"]);
        let mut set = WorkingSet::new(&snapshot);
        set.claim(&FileIdentity::from("/m/b.mp3"));
        set.claim(&FileIdentity::from("/m/c.mp3"));

        {
            let mut rest = set.unclaimed();
            assert_eq!(rest.size_hint().1, Some(1));
            assert_eq!(rest.next().map(|f| f.as_str()), Some("/m/a.mp3"));
            assert_eq!(rest.next(), None);
        }

        set.claim(&FileIdentity::from("/m/a.mp3"));
        assert_eq!(set.unclaimed().size_hint(), (0, Some(0)));
    }
}
