//! IR types.
//!
//! A type is either a concrete [`SimpleType`] (a classifier applied to type
//! arguments) or a [`MarkerType`] standing for "this type could not be
//! resolved". Markers carry a minted [`MarkerToken`]: copies of a marker
//! compare equal, independently minted markers never do, no matter what they
//! look like otherwise.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::SymbolId;

/// Declaration-site or use-site variance of a type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variance {
    #[default]
    Invariant,
    In,
    Out,
}

/// A type argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArgument {
    /// `*` projection.
    Star,
    /// A concrete argument with variance.
    Projection { variance: Variance, ty: IrType },
}

impl TypeArgument {
    /// Invariant projection of `ty`.
    pub fn invariant(ty: IrType) -> Self {
        TypeArgument::Projection {
            variance: Variance::Invariant,
            ty,
        }
    }

    /// The projected type, if this is not a star projection.
    pub fn ty(&self) -> Option<&IrType> {
        match self {
            TypeArgument::Star => None,
            TypeArgument::Projection { ty, .. } => Some(ty),
        }
    }
}

/// A classifier applied to type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleType {
    /// Class or type parameter heading the type.
    pub classifier: SymbolId,
    /// Type arguments, in declaration order of the classifier's type parameters.
    pub arguments: Vec<TypeArgument>,
    /// Whether the type admits `null`.
    pub nullable: bool,
}

/// Identity of a marker type. Only [`MarkerType::mint`] creates new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerToken(u64);

static NEXT_MARKER_TOKEN: AtomicU64 = AtomicU64::new(1);

/// The "type could not be determined" sentinel.
///
/// Behaves like a nullable `upper_bound` (the root class) wherever a concrete
/// type is needed, but equality is decided by token alone.
#[derive(Debug, Clone, Copy)]
pub struct MarkerType {
    token: MarkerToken,
    upper_bound: SymbolId,
}

impl MarkerType {
    /// Mint a brand new marker.
    ///
    /// Each call produces a marker distinct from every other one. The linkage
    /// engine mints exactly one per session; see `MarkerTypeHandler`.
    pub fn mint(upper_bound: SymbolId) -> Self {
        let token = MarkerToken(NEXT_MARKER_TOKEN.fetch_add(1, Ordering::Relaxed));
        tracing::trace!(token = token.0, "minted marker type");
        Self { token, upper_bound }
    }

    /// The identity token.
    pub fn token(&self) -> MarkerToken {
        self.token
    }

    /// The classifier this marker erases to.
    pub fn upper_bound(&self) -> SymbolId {
        self.upper_bound
    }
}

impl PartialEq for MarkerType {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for MarkerType {}

impl std::hash::Hash for MarkerType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.token.hash(state);
    }
}

/// An IR type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrType {
    Simple(SimpleType),
    Marker(MarkerType),
}

impl IrType {
    /// Non-nullable type without arguments.
    pub fn simple(classifier: SymbolId) -> Self {
        IrType::Simple(SimpleType {
            classifier,
            arguments: Vec::new(),
            nullable: false,
        })
    }

    /// Non-nullable type with arguments.
    pub fn with_arguments(classifier: SymbolId, arguments: Vec<TypeArgument>) -> Self {
        IrType::Simple(SimpleType {
            classifier,
            arguments,
            nullable: false,
        })
    }

    /// Make a simple type nullable. Markers are returned unchanged.
    pub fn nullable(self) -> Self {
        match self {
            IrType::Simple(mut simple) => {
                simple.nullable = true;
                IrType::Simple(simple)
            }
            marker => marker,
        }
    }

    /// Get as a simple type.
    pub fn as_simple(&self) -> Option<&SimpleType> {
        match self {
            IrType::Simple(simple) => Some(simple),
            IrType::Marker(_) => None,
        }
    }

    /// Head classifier of a simple type.
    pub fn classifier(&self) -> Option<SymbolId> {
        self.as_simple().map(|simple| simple.classifier)
    }

    /// All classifiers mentioned by this type, head first, then arguments depth-first.
    pub fn collect_classifiers(&self, out: &mut Vec<SymbolId>) {
        if let IrType::Simple(simple) = self {
            out.push(simple.classifier);
            for argument in &simple.arguments {
                if let Some(ty) = argument.ty() {
                    ty.collect_classifiers(out);
                }
            }
        }
    }
}
