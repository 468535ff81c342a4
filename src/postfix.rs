//! Postorder linearization of an [`Ast`] into a flat postfix token sequence,
//! suitable for a stack-based evaluator that never has to revisit the tree.

use crate::ast::{Ast, Node, NodeId};
use crate::token::Token;

/// Walks `ast` postorder (operands before operators) and returns the
/// resulting token sequence. The `unary` flag set by the parser on each
/// operator token is preserved, since it is the only way the evaluator can
/// tell a unary `*`/`+`/`-` from its binary counterpart once the tree
/// shape itself is gone.
pub fn linearize(ast: &Ast) -> Vec<Token> {
    let mut out = Vec::with_capacity(ast.len());
    visit(ast, ast.root(), &mut out);
    out
}

fn visit(ast: &Ast, id: NodeId, out: &mut Vec<Token>) {
    match ast.node(id) {
        Node::Leaf(tok) => out.push(tok.clone()),
        Node::Unary { op, operand } => {
            visit(ast, *operand, out);
            out.push(op.clone());
        }
        Node::Binary { op, left, right } => {
            visit(ast, *left, out);
            visit(ast, *right, out);
            out.push(op.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{lex, RegisterNames};
    use crate::parser::parse;
    use crate::token::TokenKind;

    struct AllRegisters;
    impl RegisterNames for AllRegisters {
        fn is_register(&self, _name: &str) -> bool { true }
    }

    fn postfix_kinds(src: &str) -> Vec<TokenKind> {
        let tokens = lex(src, &AllRegisters).unwrap();
        let ast = parse(&tokens).unwrap();
        linearize(&ast).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn binary_expression_is_operands_then_operator() {
        use TokenKind::*;
        assert_eq!(postfix_kinds("1 + 2"), vec![Num, Num, Add]);
    }

    #[test]
    fn precedence_is_already_resolved_by_tree_shape() {
        use TokenKind::*;
        // 1 + 2 * 3 -> 1 2 3 * +
        assert_eq!(postfix_kinds("1 + 2 * 3"), vec![Num, Num, Num, Mul, Add]);
    }

    #[test]
    fn unary_operand_then_operator() {
        use TokenKind::*;
        assert_eq!(postfix_kinds("-1"), vec![Num, Sub]);
    }

    #[test]
    fn unary_flag_survives_linearization() {
        let tokens = {
            let t = lex("-1 + 2", &AllRegisters).unwrap();
            let ast = parse(&t).unwrap();
            linearize(&ast)
        };
        let minus = tokens.iter().find(|t| t.kind == TokenKind::Sub).unwrap();
        assert!(minus.unary);
    }
}
