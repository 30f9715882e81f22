//! Node rendering
//!
//! One header line per node, then indented property and tag lines in
//! lexicographic order.

use std::io::{self, Write};

use crate::proto::NodeData;

use super::sink::Printer;
use super::RenderOpts;

const INDENT: &str = "        ";

/// Render one result node.
pub fn render_node<W: Write>(
    out: &mut Printer<W>,
    node: &NodeData,
    opts: RenderOpts,
) -> io::Result<()> {
    out.print(&format!("{}={}", node.form, node.valu))?;

    if !opts.hide_props {
        for (name, valu) in &node.props {
            // Universal properties keep their leading dot; relative ones
            // get the colon prefix.
            let line = if name.starts_with('.') {
                format!("{INDENT}{name} = {valu}")
            } else {
                format!("{INDENT}:{name} = {valu}")
            };
            out.print(&line)?;
        }
    }

    if !opts.hide_tags {
        for (tag, valu) in &node.tags {
            let mut printed = false;

            if let Some(valu) = valu {
                out.print(&format!("{INDENT}#{tag} = {valu}"))?;
                printed = true;
            }

            if let Some(pairs) = node.tagprops.get(tag) {
                for (prop, pval) in pairs {
                    out.print(&format!("{INDENT}#{tag}:{prop} = {pval}"))?;
                    printed = true;
                }
            }

            if !printed {
                out.print(&format!("{INDENT}#{tag}"))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{capture_printer, printed};

    fn node(form: &str, valu: &str) -> NodeData {
        NodeData {
            form: form.to_string(),
            valu: valu.to_string(),
            ..NodeData::default()
        }
    }

    #[test]
    fn test_render_bare_node() {
        let mut out = capture_printer();
        render_node(&mut out, &node("inet:ipv4", "1.2.3.4"), RenderOpts::default()).unwrap();
        assert_eq!(printed(out), "inet:ipv4=1.2.3.4\n");
    }

    #[test]
    fn test_render_props_sorted_with_prefixes() {
        let mut data = node("inet:ipv4", "1.2.3.4");
        data.props.insert("type".to_string(), "unicast".to_string());
        data.props
            .insert(".created".to_string(), "2024/01/02 03:04:05.006".to_string());
        data.props.insert("asn".to_string(), "80".to_string());

        let mut out = capture_printer();
        render_node(&mut out, &data, RenderOpts::default()).unwrap();
        let expected = concat!(
            "inet:ipv4=1.2.3.4\n",
            "        .created = 2024/01/02 03:04:05.006\n",
            "        :asn = 80\n",
            "        :type = unicast\n",
        );
        assert_eq!(printed(out), expected);
    }

    #[test]
    fn test_render_tags_sorted() {
        let mut data = node("inet:fqdn", "vertex.link");
        data.tags.insert("zz.last".to_string(), None);
        data.tags.insert("aa.first".to_string(), None);

        let mut out = capture_printer();
        render_node(&mut out, &data, RenderOpts::default()).unwrap();
        assert_eq!(
            printed(out),
            "inet:fqdn=vertex.link\n        #aa.first\n        #zz.last\n"
        );
    }

    #[test]
    fn test_render_tag_with_value_and_tagprops() {
        let mut data = node("inet:fqdn", "vertex.link");
        data.tags
            .insert("rep.vt".to_string(), Some("(2020/01/01, 2021/01/01)".to_string()));
        data.tagprops.insert(
            "rep.vt".to_string(),
            vec![
                ("score".to_string(), "100".to_string()),
                ("seen".to_string(), "2021/06/01".to_string()),
            ],
        );

        let mut out = capture_printer();
        render_node(&mut out, &data, RenderOpts::default()).unwrap();
        let expected = concat!(
            "inet:fqdn=vertex.link\n",
            "        #rep.vt = (2020/01/01, 2021/01/01)\n",
            "        #rep.vt:score = 100\n",
            "        #rep.vt:seen = 2021/06/01\n",
        );
        assert_eq!(printed(out), expected);
    }

    #[test]
    fn test_render_bare_tag_is_one_line() {
        let mut data = node("inet:fqdn", "vertex.link");
        data.tags.insert("cno.infra".to_string(), None);

        let mut out = capture_printer();
        render_node(&mut out, &data, RenderOpts::default()).unwrap();
        assert_eq!(printed(out), "inet:fqdn=vertex.link\n        #cno.infra\n");
    }

    #[test]
    fn test_render_tagprops_without_value_skip_bare_line() {
        let mut data = node("inet:fqdn", "vertex.link");
        data.tags.insert("rep.vt".to_string(), None);
        data.tagprops.insert(
            "rep.vt".to_string(),
            vec![("score".to_string(), "100".to_string())],
        );

        let mut out = capture_printer();
        render_node(&mut out, &data, RenderOpts::default()).unwrap();
        assert_eq!(
            printed(out),
            "inet:fqdn=vertex.link\n        #rep.vt:score = 100\n"
        );
    }

    #[test]
    fn test_hide_props_keeps_tags() {
        let mut data = node("inet:ipv4", "1.2.3.4");
        data.props.insert("asn".to_string(), "80".to_string());
        data.tags.insert("cno".to_string(), None);

        let opts = RenderOpts {
            hide_props: true,
            hide_tags: false,
        };
        let mut out = capture_printer();
        render_node(&mut out, &data, opts).unwrap();
        assert_eq!(printed(out), "inet:ipv4=1.2.3.4\n        #cno\n");
    }

    #[test]
    fn test_hide_tags_keeps_props() {
        let mut data = node("inet:ipv4", "1.2.3.4");
        data.props.insert("asn".to_string(), "80".to_string());
        data.tags.insert("cno".to_string(), None);

        let opts = RenderOpts {
            hide_props: false,
            hide_tags: true,
        };
        let mut out = capture_printer();
        render_node(&mut out, &data, opts).unwrap();
        assert_eq!(printed(out), "inet:ipv4=1.2.3.4\n        :asn = 80\n");
    }
}
