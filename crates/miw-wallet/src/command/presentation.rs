//! # Presentation Commands
//!
//! A presentation under validation arrives either as a compact JWT or as a
//! JSON document. [`PresentationInput`] holds exactly one of the two, and
//! which one is fixed by the command's `as_jwt` flag.

use miw_core::{Bpn, ValidationError};
use miw_vc::{Jwt, VerifiableCredential, VerifiablePresentation};
use serde_json::Value;

// ---------------------------------------------------------------------------
// CreatePresentationCommand
// ---------------------------------------------------------------------------

/// Present `credentials` from the caller's wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePresentationCommand {
    credentials: Vec<VerifiableCredential>,
    as_jwt: bool,
    audience: Option<String>,
    caller_bpn: Bpn,
}

impl CreatePresentationCommand {
    /// Start a command.
    pub fn builder() -> CreatePresentationCommandBuilder {
        CreatePresentationCommandBuilder::default()
    }

    /// Credentials to present.
    pub fn credentials(&self) -> &[VerifiableCredential] {
        &self.credentials
    }

    /// Emit a compact JWT instead of a JSON presentation.
    pub fn as_jwt(&self) -> bool {
        self.as_jwt
    }

    /// Audience of the JWT, if any.
    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    /// BPN of the requester.
    pub fn caller_bpn(&self) -> &Bpn {
        &self.caller_bpn
    }
}

/// Builder for [`CreatePresentationCommand`].
#[derive(Debug, Clone, Default)]
pub struct CreatePresentationCommandBuilder {
    credentials: Option<Vec<VerifiableCredential>>,
    as_jwt: bool,
    audience: Option<String>,
    caller_bpn: Option<Bpn>,
}

impl CreatePresentationCommandBuilder {
    /// Credentials to present.
    pub fn credentials(mut self, credentials: Vec<VerifiableCredential>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Emit a compact JWT.
    pub fn as_jwt(mut self, as_jwt: bool) -> Self {
        self.as_jwt = as_jwt;
        self
    }

    /// Blank audiences are treated as absent.
    pub fn audience(mut self, audience: Option<String>) -> Self {
        self.audience = audience.filter(|a| !a.trim().is_empty());
        self
    }

    /// BPN of the requester.
    pub fn caller_bpn(mut self, bpn: Bpn) -> Self {
        self.caller_bpn = Some(bpn);
        self
    }

    /// Check that credentials and caller are set.
    pub fn build(self) -> Result<CreatePresentationCommand, ValidationError> {
        let credentials = self
            .credentials
            .ok_or(ValidationError::MissingField("credentials"))?;
        let caller_bpn = self
            .caller_bpn
            .ok_or(ValidationError::MissingField("caller BPN"))?;
        Ok(CreatePresentationCommand {
            credentials,
            as_jwt: self.as_jwt,
            audience: self.audience,
            caller_bpn,
        })
    }
}

// ---------------------------------------------------------------------------
// ValidatePresentationCommand
// ---------------------------------------------------------------------------

/// The presentation under validation.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationInput {
    /// Compact JWT, parsed but not yet verified.
    Jwt(Jwt),
    /// JSON presentation carrying its own proof.
    Json(VerifiablePresentation),
}

/// Validate a presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatePresentationCommand {
    input: PresentationInput,
    audience: Option<String>,
    with_credential_expiry_date: bool,
}

impl ValidatePresentationCommand {
    /// Start a command.
    pub fn builder() -> ValidatePresentationCommandBuilder {
        ValidatePresentationCommandBuilder::default()
    }

    /// The presentation to check.
    pub fn input(&self) -> &PresentationInput {
        &self.input
    }

    /// Whether the input is a JWT.
    pub fn as_jwt(&self) -> bool {
        matches!(self.input, PresentationInput::Jwt(_))
    }

    /// Audience the JWT must name. Ignored for JSON presentations.
    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    /// Also report whether each embedded credential has expired.
    pub fn with_credential_expiry_date(&self) -> bool {
        self.with_credential_expiry_date
    }
}

/// Builder for [`ValidatePresentationCommand`].
#[derive(Debug, Clone, Default)]
pub struct ValidatePresentationCommandBuilder {
    as_jwt: bool,
    jwt: Option<Jwt>,
    json: Option<VerifiablePresentation>,
    audience: Option<String>,
    with_credential_expiry_date: bool,
}

impl ValidatePresentationCommandBuilder {
    /// Expect a JWT rather than a JSON presentation.
    pub fn as_jwt(mut self, as_jwt: bool) -> Self {
        self.as_jwt = as_jwt;
        self
    }

    /// The JWT to check.
    pub fn jwt(mut self, jwt: Jwt) -> Self {
        self.jwt = Some(jwt);
        self
    }

    /// The JSON presentation to check.
    pub fn presentation(mut self, vp: VerifiablePresentation) -> Self {
        self.json = Some(vp);
        self
    }

    /// Accept a request body: a JWT string, an object whose `vp` member is a
    /// JWT string, or a JSON presentation.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidField`] if the payload is none of these.
    pub fn payload(self, payload: Value) -> Result<Self, ValidationError> {
        let token = match &payload {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map.get("vp").and_then(Value::as_str).map(str::to_string),
            _ => None,
        };
        if let Some(token) = token {
            let jwt = Jwt::parse(&token)
                .map_err(|e| ValidationError::invalid_field("vp", e.to_string()))?;
            return Ok(self.jwt(jwt));
        }
        let vp: VerifiablePresentation = serde_json::from_value(payload)
            .map_err(|e| ValidationError::invalid_field("vp", e.to_string()))?;
        Ok(self.presentation(vp))
    }

    /// Audience the JWT must name. Blank is absent.
    pub fn audience(mut self, audience: Option<String>) -> Self {
        self.audience = audience.filter(|a| !a.trim().is_empty());
        self
    }

    /// Also check every embedded credential for expiry.
    pub fn with_credential_expiry_date(mut self, check: bool) -> Self {
        self.with_credential_expiry_date = check;
        self
    }

    /// # Errors
    ///
    /// - [`ValidationError::InvalidField`] if both representations were
    ///   supplied.
    /// - [`ValidationError::MissingField`] if the one selected by `as_jwt`
    ///   is absent.
    pub fn build(self) -> Result<ValidatePresentationCommand, ValidationError> {
        let input = match (self.as_jwt, self.jwt, self.json) {
            (_, Some(_), Some(_)) => {
                return Err(ValidationError::invalid_field(
                    "vp",
                    "exactly one of the JWT or JSON representation must be supplied",
                ))
            }
            (true, Some(jwt), None) => PresentationInput::Jwt(jwt),
            (true, None, _) => return Err(ValidationError::MissingField("jwt")),
            (false, None, Some(vp)) => PresentationInput::Json(vp),
            (false, _, None) => return Err(ValidationError::MissingField("presentation")),
        };
        Ok(ValidatePresentationCommand {
            input,
            audience: self.audience,
            with_credential_expiry_date: self.with_credential_expiry_date,
        })
    }
}
