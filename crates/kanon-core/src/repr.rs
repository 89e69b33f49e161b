//! Stable textual serialisation.
//!
//! `Head(op, op)` notation with atoms rendered literally. The output is
//! deterministic for interned trees, which makes it usable both for
//! diagnostics and as the lexicographic component of the canonical
//! ordering.

use std::fmt::Write;

use crate::arena::ExprArena;
use crate::expr::{ExprHandle, ExprNode, Head};

impl ExprArena {
    /// Serialises an expression.
    #[must_use]
    pub fn repr(&self, handle: ExprHandle) -> String {
        let mut out = String::new();
        self.write_repr(&mut out, handle);
        out
    }

    fn write_repr(&self, out: &mut String, handle: ExprHandle) {
        match self.node(handle) {
            ExprNode::Number(v) => {
                let _ = write!(out, "{v}");
            }
            ExprNode::Symbol(id) => out.push_str(self.symbol_name(*id)),
            ExprNode::Str(id) => {
                let _ = write!(out, "'{}'", self.string(*id));
            }
            ExprNode::Domain(d) => out.push_str(d.name()),
            ExprNode::Error { kind, arg } => {
                let _ = write!(out, "Error({kind}");
                if let Some(arg) = arg {
                    out.push_str(", ");
                    self.write_repr(out, *arg);
                }
                out.push(')');
            }
            ExprNode::Function { head, ops } => {
                match head {
                    Head::Sym(id) => out.push_str(self.symbol_name(*id)),
                    Head::Expr(h) => {
                        out.push('(');
                        self.write_repr(out, *h);
                        out.push(')');
                    }
                }
                out.push('(');
                for (i, op) in ops.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_repr(out, *op);
                }
                out.push(')');
            }
            ExprNode::Tensor { shape, data, .. } => {
                self.write_tensor(out, shape, data);
            }
        }
    }

    fn write_tensor(&self, out: &mut String, shape: &[usize], data: &[ExprHandle]) {
        if shape.len() <= 1 {
            out.push('[');
            for (i, h) in data.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                self.write_repr(out, *h);
            }
            out.push(']');
            return;
        }
        if shape[0] == 0 {
            out.push_str("[]");
            return;
        }
        let stride = data.len() / shape[0];
        out.push('[');
        for row in 0..shape[0] {
            if row > 0 {
                out.push_str(", ");
            }
            self.write_tensor(out, &shape[1..], &data[row * stride..(row + 1) * stride]);
        }
        out.push(']');
    }
}
