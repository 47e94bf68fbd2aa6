use thiserror::Error;

/// Result type alias using ApiScanError
pub type Result<T> = std::result::Result<T, ApiScanError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// programmatically and that tests assert against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Model construction
    /// A generic signature or descriptor could not be parsed
    MalformedSignature,
    /// Two declarations produced the same signature key within one artifact
    DuplicateEntity,

    // Configuration
    InvalidPolicy,

    // Integration
    Serialization,
    /// Repeated computation over the same input disagreed
    DeterminismViolation,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MalformedSignature => "ERR_MALFORMED_SIGNATURE",
            ExErrorKind::DuplicateEntity => "ERR_DUPLICATE_ENTITY",
            ExErrorKind::InvalidPolicy => "ERR_INVALID_POLICY",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::DeterminismViolation => "ERR_DETERMINISM_VIOLATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a stable kind plus optional context (operation, artifact, entity)
/// for programmatic handling and log correlation.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    artifact: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            artifact: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Set the operation name
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Set the artifact the error belongs to
    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    /// Set the entity (qualified name or signature key)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Set the human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Chain an underlying error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn artifact(&self) -> Option<&str> {
        self.artifact.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " op={}", op)?;
        }
        if let Some(artifact) = &self.artifact {
            write!(f, " artifact={}", artifact)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " entity={}", entity_id)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

// ========== Domain Errors ==========

/// Domain error taxonomy for model construction and policy loading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiScanError {
    /// A generic signature or descriptor is not well-formed
    #[error("Malformed signature on {qualified_name}: {reason} (in `{signature}`)")]
    MalformedSignature {
        qualified_name: String,
        signature: String,
        reason: String,
    },

    /// Two declarations collide on the same signature key
    #[error("Duplicate entity in artifact: {key}")]
    DuplicateEntity { key: String },

    /// Policy configuration could not be read
    #[error("Invalid compatibility policy: {message}")]
    InvalidPolicy { message: String },

    /// JSON (de)serialization failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl ApiScanError {
    /// Attach the owning declaration to a signature error raised by the parser.
    pub(crate) fn for_declaration(self, qualified_name: &str) -> Self {
        match self {
            ApiScanError::MalformedSignature {
                signature, reason, ..
            } => ApiScanError::MalformedSignature {
                qualified_name: qualified_name.to_string(),
                signature,
                reason,
            },
            other => other,
        }
    }
}

impl From<ApiScanError> for ExError {
    fn from(err: ApiScanError) -> Self {
        match err {
            ApiScanError::MalformedSignature {
                qualified_name,
                signature,
                reason,
            } => ExError::new(ExErrorKind::MalformedSignature)
                .with_entity_id(qualified_name)
                .with_message(format!("{} (in `{}`)", reason, signature)),

            ApiScanError::DuplicateEntity { key } => ExError::new(ExErrorKind::DuplicateEntity)
                .with_entity_id(key)
                .with_message("Two declarations share one signature key"),

            ApiScanError::InvalidPolicy { message } => {
                ExError::new(ExErrorKind::InvalidPolicy).with_message(message)
            }

            ApiScanError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ApiScanError {
    fn from(err: serde_json::Error) -> Self {
        ApiScanError::Serialization {
            message: err.to_string(),
        }
    }
}
