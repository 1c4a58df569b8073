//! Indented tree dump.

use std::io::{self, Write};

use lazyjson_tree::{Node, NodeKind};

/// Write `node` and everything below it, two spaces per level.
///
/// Containers print a header, then each member name (or element index) on
/// its own line one level deeper, then the member itself two levels deeper.
pub fn write_tree<W: Write>(out: &mut W, node: &Node<'_>) -> io::Result<()> {
    // (label line, node, level of the node)
    let mut stack: Vec<(Option<String>, Node<'_>, usize)> = vec![(None, node.clone(), 0)];

    while let Some((label, node, level)) = stack.pop() {
        let pad = "  ".repeat(level);
        if let Some(label) = label {
            writeln!(out, "{}{label}:", &pad[2..])?;
        }

        let kind = node.kind();
        match kind {
            NodeKind::Object | NodeKind::Array => {
                writeln!(out, "{pad}{}:", kind.label())?;
                let first = stack.len();
                for (index, child) in node.children().enumerate() {
                    let label = match kind {
                        NodeKind::Object => child.name().to_string(),
                        _ => index.to_string(),
                    };
                    stack.push((Some(label), child, level + 2));
                }
                stack[first..].reverse();
            }
            NodeKind::Number => writeln!(out, "{pad}NUMBER: {:.6}", node.value_as_f64())?,
            NodeKind::String => {
                writeln!(out, "{pad}STRING: {}", node.value_as_str().unwrap_or_default())?
            }
            _ => writeln!(out, "{pad}{}", kind.label())?,
        }
    }
    Ok(())
}
