pub const SHADER_STATUS_HEADER: &str = "X-Shader-Status";
pub const SHADER_STATUS_HEALTHY: &str = "healthy";
pub const SHADER_STATUS_READY: &str = "ready";
pub const SHADER_STATUS_NOT_READY: &str = "not_ready";
pub const SHADER_STATUS_ERROR: &str = "error";

/// Which tier answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupStatus {
    HitCache,
    HitDurable,
    Miss,
}

impl LookupStatus {
    #[inline]
    pub fn as_header_value(&self) -> &'static str {
        match self {
            LookupStatus::HitCache => "HIT_CACHE",
            LookupStatus::HitDurable => "HIT_DURABLE",
            LookupStatus::Miss => "MISS",
        }
    }
}

impl std::fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_header_value())
    }
}
