// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// Counters collected while the solver inserts rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Rules handed to the solver, flat rates included.
    pub rules_received: u64,
    /// Absolute flat rates stored as caps.
    pub flat_rates_registered: u64,
    /// Pairwise resolutions that changed a candidate.
    pub conflicts: u64,
    /// Scans restarted after a change.
    pub scan_restarts: u64,
    /// Candidates dropped entirely or reduced to zero duration.
    pub rules_discarded: u64,
    /// Pieces inserted into the ordinary store.
    pub fragments_committed: u64,
    /// Flat rates whose threshold was crossed.
    pub flat_rate_activations: u64,
}

impl SolverStatistics {
    #[inline]
    pub fn on_rule_received(&mut self) {
        self.rules_received = self.rules_received.saturating_add(1);
    }

    #[inline]
    pub fn on_flat_rate_registered(&mut self) {
        self.flat_rates_registered = self.flat_rates_registered.saturating_add(1);
    }

    #[inline]
    pub fn on_conflict(&mut self) {
        self.conflicts = self.conflicts.saturating_add(1);
    }

    #[inline]
    pub fn on_scan_restart(&mut self) {
        self.scan_restarts = self.scan_restarts.saturating_add(1);
    }

    #[inline]
    pub fn on_rule_discarded(&mut self) {
        self.rules_discarded = self.rules_discarded.saturating_add(1);
    }

    #[inline]
    pub fn on_fragment_committed(&mut self) {
        self.fragments_committed = self.fragments_committed.saturating_add(1);
    }

    #[inline]
    pub fn on_flat_rate_activated(&mut self) {
        self.flat_rate_activations = self.flat_rate_activations.saturating_add(1);
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Kerb Solver Statistics:")?;
        writeln!(f, "  Rules received:        {}", self.rules_received)?;
        writeln!(f, "  Flat rates registered: {}", self.flat_rates_registered)?;
        writeln!(f, "  Conflicts:             {}", self.conflicts)?;
        writeln!(f, "  Scan restarts:         {}", self.scan_restarts)?;
        writeln!(f, "  Rules discarded:       {}", self.rules_discarded)?;
        writeln!(f, "  Fragments committed:   {}", self.fragments_committed)?;
        writeln!(f, "  Flat rate activations: {}", self.flat_rate_activations)?;
        Ok(())
    }
}
