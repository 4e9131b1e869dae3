use ninja_engine::AssetProvider;

/// Current brush: a kind from the loaded assets plus a variant within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Palette {
    kinds: Vec<String>,
    group: usize,
    variant: u32,
}

impl Palette {
    pub(crate) fn from_assets<A>(assets: &A) -> Self
    where
        A: AssetProvider + ?Sized,
    {
        Self {
            kinds: assets.kinds().into_iter().map(str::to_string).collect(),
            group: 0,
            variant: 0,
        }
    }

    /// `None` when no tile kinds were loaded.
    pub(crate) fn current(&self) -> Option<(&str, u32)> {
        self.kinds
            .get(self.group)
            .map(|kind| (kind.as_str(), self.variant))
    }

    /// Moves `delta` kinds forward (wrapping) and resets the variant.
    pub(crate) fn cycle_group(&mut self, delta: i32) {
        if self.kinds.is_empty() || delta == 0 {
            return;
        }
        let len = self.kinds.len() as i64;
        self.group = (self.group as i64 + i64::from(delta)).rem_euclid(len) as usize;
        self.variant = 0;
    }

    /// Moves `delta` variants forward within the current kind, wrapping at
    /// `variant_count`.
    pub(crate) fn cycle_variant(&mut self, delta: i32, variant_count: usize) {
        if variant_count == 0 || delta == 0 {
            return;
        }
        let len = variant_count as i64;
        self.variant = (i64::from(self.variant) + i64::from(delta)).rem_euclid(len) as u32;
    }
}
