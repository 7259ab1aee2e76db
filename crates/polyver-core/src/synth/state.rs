//! State infrastructure: behavior contract, implementation types, instance
//! fields and the variant-switch operation.

use polyver_ast::{
    BinaryOp, Block, Expr, FieldDecl, Member, MethodDecl, Modifiers, Param, Stmt, SwitchCase,
    SwitchStmt, TypeDecl, TypeRef,
};

use crate::config::NamingConfig;

/// Adds the state-pattern skeleton to the outer declaration.
pub struct StateInfrastructureGenerator<'a> {
    naming: &'a NamingConfig,
}

impl<'a> StateInfrastructureGenerator<'a> {
    pub fn new(naming: &'a NamingConfig) -> Self {
        Self { naming }
    }

    /// Append the contract, one implementation type and one instance field
    /// per ordinal, the active-instance field and the switch operation.
    pub fn generate(&self, outer: &mut TypeDecl, ordinals: &[u32]) {
        let naming = self.naming;
        let contract = TypeRef::new(&naming.behavior_interface);

        outer.members.push(Member::Type(TypeDecl::interface(
            &naming.behavior_interface,
            Modifiers::private(),
        )));
        for &n in ordinals {
            let mut impl_type =
                TypeDecl::class(naming.impl_type(n), Modifiers::private().with_static());
            impl_type.implements.push(contract.clone());
            outer.members.push(Member::Type(impl_type));
        }
        // Assigned by every synthesized constructor.
        for &n in ordinals {
            outer.members.push(Member::Field(FieldDecl::new(
                Modifiers::private().with_final(),
                TypeRef::new(naming.impl_type(n)),
                naming.instance_field(n),
            )));
        }
        outer.members.push(Member::Field(FieldDecl::new(
            Modifiers::private(),
            contract,
            &naming.active_field,
        )));
        outer.members.push(Member::Method(self.switch_method(ordinals)));
    }

    /// `public void __switchToVersion(int version)`: one arm per ordinal,
    /// and a default arm that rejects unknown ordinals.
    fn switch_method(&self, ordinals: &[u32]) -> MethodDecl {
        let naming = self.naming;
        let mut cases: Vec<SwitchCase> = ordinals
            .iter()
            .map(|&n| SwitchCase {
                labels: vec![Expr::int(i64::from(n))],
                body: vec![
                    Stmt::expr(Expr::assign(
                        Expr::this_field(&naming.active_field),
                        Expr::this_field(naming.instance_field(n)),
                    )),
                    Stmt::Break,
                ],
            })
            .collect();
        cases.push(SwitchCase {
            labels: vec![],
            body: vec![Stmt::Throw(Expr::new_object(
                TypeRef::new("IllegalArgumentException"),
                vec![Expr::binary(
                    BinaryOp::Add,
                    Expr::string("Unknown version: "),
                    Expr::name("version"),
                )],
            ))],
        });

        MethodDecl {
            modifiers: Modifiers::public(),
            return_type: TypeRef::void(),
            name: naming.switch_method.clone(),
            params: vec![Param::new(TypeRef::new("int"), "version")],
            body: Some(Block::new(vec![Stmt::Switch(SwitchStmt {
                selector: Expr::name("version"),
                cases,
            })])),
        }
    }
}
