/// Cache keys partition the rule set by group, plus a distinguished `All`
/// key for the unfiltered set. Mirrors the original's `"all"` / per-group
/// Redis key scheme.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    All,
    Group(String),
}

impl CacheKey {
    pub fn for_group(group: Option<&str>) -> Self {
        match group {
            Some(group) => CacheKey::Group(group.to_string()),
            None => CacheKey::All,
        }
    }

    /// Whether invalidating `target` should also drop this key: an
    /// explicit group invalidation only touches its own key and `All`
    /// (since `All` may include that group's rules); a `None` target
    /// invalidates everything.
    pub fn affected_by(&self, target: Option<&CacheKey>) -> bool {
        match target {
            None => true,
            Some(target) => self == target || matches!(self, CacheKey::All),
        }
    }
}
