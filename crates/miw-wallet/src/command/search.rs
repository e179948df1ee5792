//! # Credential Search
//!
//! One command shape serves both search directions. The sort column type
//! parameter fixes which columns are legal: a holder search sorts by
//! [`SortColumn`], an issuer search by [`CredentialSortColumn`].

use miw_core::{
    Bpn, CredentialId, CredentialSortColumn, Identifier, SortColumn, SortDirection, TypeToSearch,
    ValidationError,
};

use super::{page_bound, DEFAULT_PAGE_SIZE};

/// Search over the credentials held by the caller's wallet.
pub type HolderCredentialSearch = CredentialSearch<SortColumn>;

/// Search over the credentials issued by the caller's wallet.
pub type IssuerCredentialSearch = CredentialSearch<CredentialSortColumn>;

/// A validated credential search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSearch<C> {
    credential_id: Option<CredentialId>,
    identifier: Option<Identifier>,
    types: Vec<String>,
    sort_column: C,
    sort_direction: SortDirection,
    page_number: u32,
    page_size: u32,
    caller_bpn: Bpn,
}

impl<C: Copy> CredentialSearch<C> {
    /// Start a search.
    pub fn builder() -> CredentialSearchBuilder<C> {
        CredentialSearchBuilder::default()
    }

    /// Credential id filter.
    pub fn credential_id(&self) -> Option<&CredentialId> {
        self.credential_id.as_ref()
    }

    /// Counterparty filter: the issuer for holder searches, the holder for
    /// issuer searches.
    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    /// Type filter. Empty means any type.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Column to order by.
    pub fn sort_column(&self) -> C {
        self.sort_column
    }

    /// Order direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Zero-based page index.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Page length.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// BPN of the requester.
    pub fn caller_bpn(&self) -> &Bpn {
        &self.caller_bpn
    }
}

/// Builder for [`CredentialSearch`].
#[derive(Debug, Clone)]
pub struct CredentialSearchBuilder<C> {
    credential_id: Option<CredentialId>,
    identifier: Option<Identifier>,
    types: Vec<String>,
    sort: Option<(C, SortDirection)>,
    page_number: u32,
    page_size: u32,
    caller_bpn: Option<Bpn>,
}

impl<C> Default for CredentialSearchBuilder<C> {
    fn default() -> Self {
        Self {
            credential_id: None,
            identifier: None,
            types: Vec::new(),
            sort: None,
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
            caller_bpn: None,
        }
    }
}

impl<C: Copy> CredentialSearchBuilder<C> {
    /// Filter on one credential id.
    pub fn credential_id(mut self, id: Option<CredentialId>) -> Self {
        self.credential_id = id;
        self
    }

    /// Filter on the counterparty.
    pub fn identifier(mut self, identifier: Option<Identifier>) -> Self {
        self.identifier = identifier;
        self
    }

    /// Filter on arbitrary type labels.
    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Add one of the well-known searchable types.
    pub fn with_type(mut self, ty: TypeToSearch) -> Self {
        self.types.push(ty.label().to_string());
        self
    }

    /// Order by `column`.
    pub fn sort(mut self, column: C, direction: SortDirection) -> Self {
        self.sort = Some((column, direction));
        self
    }

    /// Zero-based page index.
    ///
    /// # Errors
    ///
    /// Rejects negative values.
    pub fn page_number(mut self, page_number: i64) -> Result<Self, ValidationError> {
        self.page_number = page_bound("page number", page_number, 0)?;
        Ok(self)
    }

    /// Page length.
    ///
    /// # Errors
    ///
    /// Rejects negative values.
    pub fn page_size(mut self, page_size: i64) -> Result<Self, ValidationError> {
        self.page_size = page_bound("page size", page_size, 0)?;
        Ok(self)
    }

    /// BPN of the requester.
    pub fn caller_bpn(mut self, bpn: Bpn) -> Self {
        self.caller_bpn = Some(bpn);
        self
    }

    /// # Errors
    ///
    /// [`ValidationError::MissingField`] for the sort, then the caller.
    pub fn build(self) -> Result<CredentialSearch<C>, ValidationError> {
        let (sort_column, sort_direction) = self.sort.ok_or(ValidationError::MissingField("sort"))?;
        let caller_bpn = self
            .caller_bpn
            .ok_or(ValidationError::MissingField("caller BPN"))?;
        Ok(CredentialSearch {
            credential_id: self.credential_id,
            identifier: self.identifier,
            types: self.types,
            sort_column,
            sort_direction,
            page_number: self.page_number,
            page_size: self.page_size,
            caller_bpn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller() -> Bpn {
        Bpn::new("BPNL000000000099").unwrap()
    }

    #[test]
    fn defaults_apply() {
        let search = HolderCredentialSearch::builder()
            .sort(SortColumn::CreatedAt, SortDirection::Desc)
            .caller_bpn(caller())
            .build()
            .unwrap();
        assert_eq!(search.page_number(), 0);
        assert_eq!(search.page_size(), DEFAULT_PAGE_SIZE);
        assert!(search.types().is_empty());
        assert!(search.credential_id().is_none());
    }

    #[test]
    fn negative_page_arguments_fail_at_the_setter() {
        assert!(IssuerCredentialSearch::builder().page_number(-1).is_err());
        assert!(IssuerCredentialSearch::builder().page_size(-1).is_err());
        assert!(IssuerCredentialSearch::builder().page_size(0).is_ok());
    }

    #[test]
    fn missing_sort_is_reported_before_missing_caller() {
        let err = HolderCredentialSearch::builder().build().unwrap_err();
        assert_eq!(err, ValidationError::MissingField("sort"));

        let err = HolderCredentialSearch::builder()
            .sort(SortColumn::Type, SortDirection::Asc)
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("caller BPN"));
    }

    #[test]
    fn well_known_types_are_added_by_label() {
        let search = IssuerCredentialSearch::builder()
            .with_type(TypeToSearch::MembershipCredential)
            .sort(CredentialSortColumn::HolderDid, SortDirection::Asc)
            .caller_bpn(caller())
            .build()
            .unwrap();
        assert_eq!(search.types(), ["MembershipCredential".to_string()]);
        assert_eq!(search.sort_column(), CredentialSortColumn::HolderDid);
    }
}
