use serde::Serialize;

/// Outcome counters of one mapping generation call.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MappingStats {
    /// Field rules the generator produced
    pub auto_generated: usize,

    /// Target fields left without a rule
    pub manual: usize,

    /// Names of the target fields counted in `manual`
    pub manual_fields: Vec<String>,

    /// Fields whose type changed incompatibly and received an `identity`
    /// cast
    pub incompatible_fields: Vec<String>,
}

impl MappingStats {
    /// `true` when every target field has a rule.
    ///
    /// A mapping that is not complete silently omits the unmapped fields
    /// when applied.
    pub fn is_complete(&self) -> bool {
        self.manual == 0
    }
}
