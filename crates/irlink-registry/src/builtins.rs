//! Built-in declarations every link needs.

use irlink_core::{
    ClassDecl, ClassKind, Declaration, DeclarationKind, DeclarationParent, ExternalPackageFragment,
    FragmentId, FunctionDecl, FunctionFlags, IdSignature, IrType, Modality, SymbolId, SymbolKind,
    ValueParameter,
};

use crate::{RegistryError, SymbolTable};

const BUILTINS_PACKAGE: &str = "kotlin";
const INTERNAL_PACKAGE: &str = "kotlin.internal";

/// Symbols of the built-in classes and intrinsics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrBuiltIns {
    /// Fragment all built-ins are parented under.
    pub fragment: FragmentId,
    /// Root of the class hierarchy.
    pub any_class: SymbolId,
    /// Bottom type.
    pub nothing_class: SymbolId,
    pub unit_class: SymbolId,
    pub string_class: SymbolId,
    /// `throwLinkageError(message: String): Nothing`.
    pub linkage_error_symbol: SymbolId,
}

impl IrBuiltIns {
    /// Register the built-ins in `table`.
    ///
    /// Built-ins are declared by signature, so installing into a table that
    /// already has them bound fails with [`RegistryError::AlreadyBound`].
    pub fn install(table: &mut SymbolTable) -> Result<Self, RegistryError> {
        let fragment =
            table.add_fragment(ExternalPackageFragment::new("<builtins>", BUILTINS_PACKAGE));
        let parent = DeclarationParent::ExternalFragment(fragment);

        let any_class = define_class(table, parent, "Any", ClassDecl::new(ClassKind::Class, Modality::Open))?;
        let nothing_class =
            define_class(table, parent, "Nothing", ClassDecl::new(ClassKind::Class, Modality::Final))?;
        let unit_class = define_class(
            table,
            parent,
            "Unit",
            ClassDecl::new(ClassKind::Object, Modality::Final).with_super_type(IrType::simple(any_class)),
        )?;
        let string_class = define_class(
            table,
            parent,
            "String",
            ClassDecl::new(ClassKind::Class, Modality::Final).with_super_type(IrType::simple(any_class)),
        )?;

        let linkage_error_symbol = table.define(
            SymbolKind::Function,
            Some(IdSignature::member(
                INTERNAL_PACKAGE,
                "throwLinkageError",
                &["kotlin.String"],
            )),
            |symbol| {
                let function = FunctionDecl::new(IrType::simple(nothing_class))
                    .with_parameter(ValueParameter::new("message", IrType::simple(string_class)))
                    .with_flags(FunctionFlags::EXTERNAL)
                    .without_body();
                Declaration::new(
                    symbol,
                    "throwLinkageError",
                    parent,
                    DeclarationKind::Function(function),
                )
            },
        )?;

        tracing::debug!(?any_class, ?nothing_class, ?linkage_error_symbol, "installed built-ins");

        Ok(Self {
            fragment,
            any_class,
            nothing_class,
            unit_class,
            string_class,
            linkage_error_symbol,
        })
    }

    pub fn any_type(&self) -> IrType {
        IrType::simple(self.any_class)
    }

    pub fn nothing_type(&self) -> IrType {
        IrType::simple(self.nothing_class)
    }

    pub fn unit_type(&self) -> IrType {
        IrType::simple(self.unit_class)
    }

    pub fn string_type(&self) -> IrType {
        IrType::simple(self.string_class)
    }
}

fn define_class(
    table: &mut SymbolTable,
    parent: DeclarationParent,
    name: &str,
    class: ClassDecl,
) -> Result<SymbolId, RegistryError> {
    table.define(
        SymbolKind::Class,
        Some(IdSignature::common(BUILTINS_PACKAGE, name)),
        |symbol| {
            let class = class.with_this_receiver(ValueParameter::new("<this>", IrType::simple(symbol)));
            Declaration::new(symbol, name, parent, DeclarationKind::Class(class))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_binds_everything() {
        let mut table = SymbolTable::new();
        let builtins = IrBuiltIns::install(&mut table).unwrap();

        assert!(table.all_unbound().is_empty());
        assert_eq!(table.fq_name(builtins.any_class).as_deref(), Some("Any"));
        assert_eq!(
            table.lookup(&IdSignature::common("kotlin", "Nothing")),
            Some(builtins.nothing_class)
        );
        assert!(table.file_of(builtins.string_class).is_none());
    }

    #[test]
    fn linkage_error_intrinsic_shape() {
        let mut table = SymbolTable::new();
        let builtins = IrBuiltIns::install(&mut table).unwrap();

        let function = table.function(builtins.linkage_error_symbol).unwrap();
        assert_eq!(function.return_type, builtins.nothing_type());
        assert_eq!(function.value_parameters.len(), 1);
        assert_eq!(function.value_parameters[0].ty, builtins.string_type());
        assert!(function.body.is_none());
    }

    #[test]
    fn installing_twice_fails() {
        let mut table = SymbolTable::new();
        IrBuiltIns::install(&mut table).unwrap();
        let err = IrBuiltIns::install(&mut table).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyBound { .. }));
    }
}
