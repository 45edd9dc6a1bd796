//! Cross-module declaration identity.
//!
//! An [`IdSignature`] is what a separately compiled module records when it
//! references a declaration it does not own. Linking resolves signatures to
//! declarations; when a library drifts, some signatures stop resolving and the
//! symbols carrying them stay unbound.
//!
//! Member signatures carry a [`SignatureHash`] computed deterministically from
//! the member name and its parameter types, so overloads get distinct
//! signatures without depending on declaration order.
//!
//! # Examples
//!
//! ```
//! use irlink_core::{IdSignature, SignatureHash};
//!
//! let bar = IdSignature::member("demo", "Foo.bar", &["kotlin.Int"]);
//! assert_eq!(bar.declaration_fq_name(), Some("Foo.bar"));
//!
//! let h1 = SignatureHash::from_member("bar", &["kotlin.Int", "kotlin.String"]);
//! let h2 = SignatureHash::from_member("bar", &["kotlin.String", "kotlin.Int"]);
//! assert_ne!(h1, h2); // parameter order matters
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for signature hashing.
pub mod hash_constants {
    /// Separator constant between parameter positions.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for member hashes.
    pub const MEMBER: u64 = 0x5ea77ffbcdf5f302;

    /// Parameter position mixing constants.
    /// Each position gets its own constant so that parameter order matters.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

/// A deterministic 64-bit hash distinguishing overloads of a member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SignatureHash(pub u64);

impl SignatureHash {
    /// Hash a member name together with its ordered parameter type names.
    #[inline]
    pub fn from_member(name: &str, param_types: &[&str]) -> Self {
        let mut hash = hash_constants::MEMBER ^ xxh64(name.as_bytes(), 0);
        for (i, param) in param_types.iter().enumerate() {
            let marker = hash_constants::PARAM_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
            // wrapping_mul keeps this non-commutative, unlike a plain XOR fold
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker ^ xxh64(param.as_bytes(), 0));
        }
        SignatureHash(hash)
    }
}

impl fmt::Debug for SignatureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureHash({:016x})", self.0)
    }
}

impl fmt::Display for SignatureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A public signature: package plus dotted declaration path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommonSignature {
    /// Package, dot separated (e.g. `demo.app`). Empty for the root package.
    pub package_fq_name: String,
    /// Declaration path inside the package (e.g. `Foo.bar`).
    pub declaration_fq_name: String,
    /// Overload discriminator for callables.
    pub id: Option<SignatureHash>,
    /// Flags mask, kept only for rendering.
    pub mask: u64,
}

impl CommonSignature {
    /// Create a signature without an overload id.
    pub fn new(package_fq_name: impl Into<String>, declaration_fq_name: impl Into<String>) -> Self {
        Self {
            package_fq_name: package_fq_name.into(),
            declaration_fq_name: declaration_fq_name.into(),
            id: None,
            mask: 0,
        }
    }

    /// Set the overload id.
    pub fn with_id(mut self, id: SignatureHash) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the flags mask.
    pub fn with_mask(mut self, mask: u64) -> Self {
        self.mask = mask;
        self
    }

    /// Last segment of the declaration path.
    pub fn short_name(&self) -> &str {
        self.declaration_fq_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.declaration_fq_name)
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(&self.package_fq_name);
        out.push('/');
        out.push_str(&self.declaration_fq_name);
        out.push('|');
        match self.id {
            Some(id) => out.push_str(&id.to_string()),
            None => out.push_str("null"),
        }
        out.push('[');
        out.push_str(&self.mask.to_string());
        out.push(']');
    }
}

/// Stable cross-module identifier of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdSignature {
    /// Publicly addressable declaration.
    Common(CommonSignature),
    /// A declaration nested in a non-public container.
    Composite {
        container: Box<IdSignature>,
        inner: Box<IdSignature>,
    },
    /// Property accessor: the property signature plus the accessor's own.
    Accessor {
        property: Box<IdSignature>,
        accessor: CommonSignature,
    },
    /// File-private declaration.
    FileLocal {
        container: Box<IdSignature>,
        id: u64,
    },
    /// Local declaration with a scope-relative id.
    Scoped { id: u32 },
    /// The file itself.
    File { path: String },
}

impl IdSignature {
    /// Public signature without overload id (classes, properties).
    pub fn common(package: impl Into<String>, declaration: impl Into<String>) -> Self {
        IdSignature::Common(CommonSignature::new(package, declaration))
    }

    /// Public callable signature; the id is hashed from the short name and parameter types.
    pub fn member(
        package: impl Into<String>,
        declaration: impl Into<String>,
        param_types: &[&str],
    ) -> Self {
        let common = CommonSignature::new(package, declaration);
        let id = SignatureHash::from_member(common.short_name(), param_types);
        IdSignature::Common(common.with_id(id))
    }

    /// Accessor signature of `property`.
    pub fn accessor(property: IdSignature, accessor: CommonSignature) -> Self {
        IdSignature::Accessor {
            property: Box::new(property),
            accessor,
        }
    }

    /// Composite signature.
    pub fn composite(container: IdSignature, inner: IdSignature) -> Self {
        IdSignature::Composite {
            container: Box::new(container),
            inner: Box::new(inner),
        }
    }

    /// Get as a common signature.
    pub fn as_common(&self) -> Option<&CommonSignature> {
        match self {
            IdSignature::Common(common) => Some(common),
            _ => None,
        }
    }

    /// Whether other modules can refer to this signature.
    pub fn is_public(&self) -> bool {
        match self {
            IdSignature::Common(_) | IdSignature::Accessor { .. } => true,
            IdSignature::Composite { container, .. } => container.is_public(),
            IdSignature::FileLocal { .. } | IdSignature::Scoped { .. } | IdSignature::File { .. } => {
                false
            }
        }
    }

    /// The dotted declaration path, when the signature shape has one.
    pub fn declaration_fq_name(&self) -> Option<&str> {
        match self {
            IdSignature::Common(common) => Some(&common.declaration_fq_name),
            IdSignature::Composite { inner, .. } => inner.declaration_fq_name(),
            IdSignature::Accessor { accessor, .. } => Some(&accessor.declaration_fq_name),
            _ => None,
        }
    }

    /// Whether this is an accessor signature of `property`.
    pub fn is_accessor_of(&self, property: &IdSignature) -> bool {
        matches!(self, IdSignature::Accessor { property: p, .. } if p.as_ref() == property)
    }

    /// Human readable rendering used in diagnostics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            IdSignature::Common(common) => common.render_into(out),
            IdSignature::Composite { container, inner } => {
                out.push_str("[ ");
                container.render_into(out);
                out.push_str(" <- ");
                inner.render_into(out);
                out.push_str(" ]");
            }
            IdSignature::Accessor { accessor, .. } => accessor.render_into(out),
            IdSignature::FileLocal { container, id } => {
                container.render_into(out);
                out.push(':');
                out.push_str(&id.to_string());
            }
            IdSignature::Scoped { id } => {
                out.push('$');
                out.push_str(&id.to_string());
            }
            IdSignature::File { path } => {
                out.push_str("File '");
                out.push_str(path);
                out.push('\'');
            }
        }
    }
}

impl fmt::Display for IdSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
