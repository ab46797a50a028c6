use crate::containers::HashMap;
use crate::engine::variables::DomainId;

/// Names given to variables when they were created.
#[derive(Debug, Default, Clone)]
pub(crate) struct VariableNames {
    integers: HashMap<DomainId, String>,
    domain_by_name: HashMap<String, DomainId>,
}

impl VariableNames {
    pub(crate) fn get_int_name(&self, domain_id: DomainId) -> Option<&str> {
        self.integers.get(&domain_id).map(|s| s.as_str())
    }

    pub(crate) fn get_domain_by_name(&self, name: &str) -> Option<DomainId> {
        self.domain_by_name.get(name).copied()
    }

    /// Names `integer`, replacing an earlier name if there was one.
    pub(crate) fn add_integer(&mut self, integer: DomainId, name: String) {
        let _ = self.integers.insert(integer, name.clone());
        let _ = self.domain_by_name.insert(name, integer);
    }
}
