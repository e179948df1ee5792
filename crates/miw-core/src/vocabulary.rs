//! # Closed Vocabularies
//!
//! Every externally supplied label (sort column, searchable credential
//! type, activity type, framework credential type) maps onto an exhaustive
//! enum. Lookup is total over the declared label set and returns
//! [`ValidationError::UnknownLabel`] for anything else. There is no
//! default variant and no `Option` result.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The base W3C type every credential carries. It is stripped before a
/// credential's type list is persisted as a label.
pub const BASE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// Declares a closed enum with a one-to-one label mapping, strict lookup,
/// `Display`, `FromStr` and label-based serde.
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($vocabulary:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[doc = concat!("The `", $label, "` label.")]
                $variant
            ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// The external label for this variant.
            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// Strict label lookup.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::UnknownLabel`] for any label
            /// outside the declared set.
            pub fn from_label(label: &str) -> Result<Self, ValidationError> {
                match label {
                    $( $label => Ok($name::$variant), )+
                    other => Err(ValidationError::UnknownLabel {
                        vocabulary: $vocabulary,
                        label: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_label(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::from_label(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

label_enum! {
    /// Credential types a holder or issuer search may filter on.
    pub enum TypeToSearch("credential type") {
        BpnCredential => "BpnCredential",
        SummaryCredential => "SummaryCredential",
        MembershipCredential => "MembershipCredential",
    }
}

label_enum! {
    /// Sortable columns of a holder-side credential search.
    pub enum SortColumn("sort column") {
        CreatedAt => "createdAt",
        IssuerDid => "issuerDid",
        HolderDid => "holderDid",
        Type => "type",
        CredentialId => "credentialId",
        SelfIssued => "selfIssued",
        Stored => "stored",
    }
}

label_enum! {
    /// Sortable columns of an issuer-side credential search.
    pub enum CredentialSortColumn("credential sort column") {
        CreatedAt => "createdAt",
        HolderDid => "holderDid",
        Type => "type",
        CredentialId => "credentialId",
    }
}

label_enum! {
    /// Sortable columns of the authority's wallet listing.
    pub enum WalletSortColumn("wallet sort column") {
        CreatedAt => "createdAt",
        Name => "name",
        Bpn => "bpn",
        Did => "did",
    }
}

label_enum! {
    /// Activity a dismantler credential attests to.
    pub enum ActivityType("activity type") {
        VehicleDismantle => "vehicleDismantle",
    }
}

label_enum! {
    /// Use-case framework credentials the authority may issue.
    pub enum FrameworkCredentialType("framework credential type") {
        ResiliencyCredential => "ResiliencyCredential",
        BehaviorTwinCredential => "BehaviorTwinCredential",
        PcfCredential => "PcfCredential",
        SustainabilityCredential => "SustainabilityCredential",
        QualityCredential => "QualityCredential",
        TraceabilityCredential => "TraceabilityCredential",
    }
}

/// Direction of a sort. Labels are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortDirection {
    /// Case-insensitive lookup of `asc` / `desc`.
    pub fn from_label(label: &str) -> Result<Self, ValidationError> {
        match label.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ValidationError::UnknownLabel {
                vocabulary: "sort direction",
                label: label.to_string(),
            }),
        }
    }

    /// The lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_round_trips() {
        for col in SortColumn::ALL {
            assert_eq!(SortColumn::from_label(col.label()).unwrap(), *col);
        }
        for col in CredentialSortColumn::ALL {
            assert_eq!(CredentialSortColumn::from_label(col.label()).unwrap(), *col);
        }
        for col in WalletSortColumn::ALL {
            assert_eq!(WalletSortColumn::from_label(col.label()).unwrap(), *col);
        }
        for ty in TypeToSearch::ALL {
            assert_eq!(TypeToSearch::from_label(ty.label()).unwrap(), *ty);
        }
        for ty in FrameworkCredentialType::ALL {
            assert_eq!(FrameworkCredentialType::from_label(ty.label()).unwrap(), *ty);
        }
    }

    #[test]
    fn unknown_label_is_an_error_not_a_default() {
        let err = SortColumn::from_label("createdat").unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownLabel {
                vocabulary: "sort column",
                label: "createdat".to_string(),
            }
        );
    }

    #[test]
    fn issuer_columns_exclude_holder_only_columns() {
        assert!(CredentialSortColumn::from_label("issuerDid").is_err());
        assert!(CredentialSortColumn::from_label("selfIssued").is_err());
    }

    #[test]
    fn activity_type_label() {
        assert_eq!(
            ActivityType::from_label("vehicleDismantle").unwrap(),
            ActivityType::VehicleDismantle
        );
        assert!(ActivityType::from_label("VehicleDismantle").is_err());
    }

    #[test]
    fn sort_direction_is_case_insensitive() {
        assert_eq!(SortDirection::from_label("ASC").unwrap(), SortDirection::Asc);
        assert_eq!(SortDirection::from_label("Desc").unwrap(), SortDirection::Desc);
        assert!(SortDirection::from_label("up").is_err());
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&TypeToSearch::MembershipCredential).unwrap();
        assert_eq!(json, r#""MembershipCredential""#);
        assert!(serde_json::from_str::<TypeToSearch>(r#""Nope""#).is_err());
    }
}
