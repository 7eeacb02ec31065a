//! Turning a [`Trail`] into something a view can draw.

use std::fmt::Write;

use askama_escape::{escape, Html};

use crate::{builder::Trail, resolver::ParamOption};

/// One drawable element of a breadcrumb bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Crumb<'a> {
    /// A link to an ancestor page.
    Link {
        /// Where the link points.
        href: &'a str,
        /// The link text.
        title: &'a str,
        /// The icon name.
        icon: &'a str,
    },
    /// The current page. Never a link.
    Text {
        /// The text.
        title: &'a str,
        /// The icon name.
        icon: &'a str,
    },
    /// A picker for switching one parameter in place.
    Selector {
        /// The index of the node in the trail, passed back to
        /// [`BreadcrumbNavigator::select`](crate::BreadcrumbNavigator::select).
        node_index: usize,
        /// The parameter name.
        key: &'a str,
        /// The current value.
        current: &'a str,
        /// The sibling choices.
        options: &'a [ParamOption],
    },
}

/// Lay out `trail` as crumbs.
///
/// Nodes with switchable parameters whose sibling options are known become one
/// [`Crumb::Selector`] per parameter. Every other node is a [`Crumb::Link`], except the last one,
/// which is [`Crumb::Text`].
pub fn render(trail: &Trail) -> Vec<Crumb<'_>> {
    let last = trail.nodes.len().saturating_sub(1);
    let mut crumbs = Vec::with_capacity(trail.nodes.len());

    for (index, node) in trail.nodes.iter().enumerate() {
        let selectors: Vec<Crumb<'_>> = node
            .params
            .iter()
            .filter_map(|param| {
                let options = trail.options_for(&param.key);
                (!options.is_empty()).then_some(Crumb::Selector {
                    node_index: index,
                    key: &param.key,
                    current: &param.value,
                    options,
                })
            })
            .collect();

        if !selectors.is_empty() {
            crumbs.extend(selectors);
        } else if index == last {
            crumbs.push(Crumb::Text {
                title: &node.title,
                icon: &node.icon,
            });
        } else {
            crumbs.push(Crumb::Link {
                href: &node.path,
                title: &node.title,
                icon: &node.icon,
            });
        }
    }

    crumbs
}

/// Render `trail` as an HTML `<nav>` element.
///
/// ```rust
/// # use carlot_breadcrumbs::{render::render_html, Trail};
/// let html = render_html(&Trail::default());
/// assert_eq!(
///     html,
///     r#"<nav class="breadcrumbs"><ol><li><span class="icon" data-icon="home"></span><span>Home</span></li></ol></nav>"#
/// );
/// ```
pub fn render_html(trail: &Trail) -> String {
    let mut buf = String::new();
    // writing to a String cannot fail
    let _ = write_html(&mut buf, trail);
    buf
}

fn write_html(buf: &mut impl Write, trail: &Trail) -> std::fmt::Result {
    write!(buf, r#"<nav class="breadcrumbs"><ol>"#)?;

    for crumb in render(trail) {
        write!(buf, "<li>")?;
        match crumb {
            Crumb::Link { href, title, icon } => {
                write_icon(buf, icon)?;
                write!(
                    buf,
                    r#"<a href="{}">{}</a>"#,
                    escape(href, Html),
                    escape(title, Html)
                )?;
            }
            Crumb::Text { title, icon } => {
                write_icon(buf, icon)?;
                write!(buf, "<span>{}</span>", escape(title, Html))?;
            }
            Crumb::Selector {
                node_index,
                key,
                current,
                options,
            } => {
                write!(
                    buf,
                    r#"<select data-node="{node_index}" data-key="{}">"#,
                    escape(key, Html)
                )?;
                for option in options {
                    let selected = if option.value == current {
                        " selected"
                    } else {
                        ""
                    };
                    write!(
                        buf,
                        r#"<option value="{}"{selected}>{}</option>"#,
                        escape(&option.value, Html),
                        escape(&option.label, Html)
                    )?;
                }
                write!(buf, "</select>")?;
            }
        }
        write!(buf, "</li>")?;
    }

    write!(buf, "</ol></nav>")
}

fn write_icon(buf: &mut impl Write, icon: &str) -> std::fmt::Result {
    if icon.is_empty() {
        return Ok(());
    }
    write!(
        buf,
        r#"<span class="icon" data-icon="{}"></span>"#,
        escape(icon, Html)
    )
}
