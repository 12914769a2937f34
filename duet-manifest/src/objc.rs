//! Objective-C rendering of manifest members.
//!
//! Identifiers become `NSString` constants. Colours become `UIColor` class
//! methods; their bodies are constructs because wide-gamut initialisers and
//! lightweight generics do not exist on the legacy target.

use duet_codegen::{
    CodeBuilder, Construct, FragmentRenderer, GenerationUnit, MemberContext, Result,
    SubstitutionTable, TargetMode, UnitContext,
};
use duet_core::upper_first;

use crate::Entry;

/// A colour class method: `[method, red, green, blue, alpha]`.
pub const COLOR_ACCESSOR: &str = "color-accessor";
/// Declaration of the accessor returning every colour of a unit: `[method]`.
pub const ALL_COLORS_DECLARATION: &str = "all-colors-declaration";
/// Definition of that accessor: `[method, colour method...]`.
pub const ALL_COLORS_DEFINITION: &str = "all-colors-definition";

const ALL_COLORS: &str = "allColors";

/// Renders [`Entry`] members as Objective-C.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjcRenderer;

impl ObjcRenderer {
    fn color_method(name: &str) -> String {
        format!("{}Color", name)
    }

    fn constant_name(unit: &str, member: &str) -> String {
        format!("{}{}", unit, upper_first(member))
    }
}

impl FragmentRenderer<Entry> for ObjcRenderer {
    fn begin_unit(&self, unit: &UnitContext<'_, Entry>, out: &mut GenerationUnit) -> Result<()> {
        let has_colors = unit
            .members
            .iter()
            .any(|m| matches!(m.value, Entry::Color(_)));

        // UIKit pulls in Foundation
        if has_colors {
            out.add_import("<UIKit/UIKit.h>");
        } else {
            out.add_import("<Foundation/Foundation.h>");
        }
        Ok(())
    }

    fn render_member(
        &self,
        unit: &UnitContext<'_, Entry>,
        member: &MemberContext<'_, Entry>,
        out: &mut GenerationUnit,
    ) -> Result<()> {
        match member.value {
            Entry::Identifier(value) => {
                let constant = Self::constant_name(unit.name, member.name);
                out.add_declaration_fragment(format!("extern NSString *const {};", constant))
                    .add_definition_fragment(format!(
                        "NSString *const {} = @\"{}\";",
                        constant,
                        escape(value)
                    ))
                    .add_symbol(constant);
            }
            Entry::Color(color) => {
                let method = Self::color_method(member.name);
                let [red, green, blue, alpha] = color.components();
                out.add_declaration_fragment(format!("+ (UIColor *){};", method))
                    .add_definition_fragment(
                        Construct::new(COLOR_ACCESSOR).args([method, red, green, blue, alpha]),
                    );
            }
        }
        Ok(())
    }

    fn finish_unit(&self, unit: &UnitContext<'_, Entry>, out: &mut GenerationUnit) -> Result<()> {
        let methods: Vec<String> = unit
            .named_members()
            .filter(|(_, m)| matches!(m.value, Entry::Color(_)))
            .map(|(name, _)| Self::color_method(name))
            .collect();
        if methods.is_empty() {
            return Ok(());
        }

        out.add_declaration_fragment(Construct::new(ALL_COLORS_DECLARATION).arg(ALL_COLORS))
            .add_definition_fragment(
                Construct::new(ALL_COLORS_DEFINITION)
                    .arg(ALL_COLORS)
                    .args(methods),
            );
        Ok(())
    }
}

/// Escape a value for an Objective-C string literal.
///
/// Control characters without a short escape become octal escapes of their
/// UTF-8 bytes. Octal escapes stop after three digits, so a following digit
/// cannot be swallowed the way it would be by `\x`.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => {
                let mut bytes = [0; 4];
                for byte in c.encode_utf8(&mut bytes).bytes() {
                    escaped.push_str(&format!("\\{:03o}", byte));
                }
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

fn color_accessor(construct: &Construct, initializer: &str) -> String {
    CodeBuilder::objc()
        .line(&format!("+ (UIColor *){}", construct.arg_at(0)))
        .block_with_close("{", "}", |b| {
            b.line(&format!(
                "return [UIColor {}:{} green:{} blue:{} alpha:{}];",
                initializer,
                construct.arg_at(1),
                construct.arg_at(2),
                construct.arg_at(3),
                construct.arg_at(4)
            ))
        })
        .build()
}

fn all_colors_accessor(construct: &Construct, return_type: &str) -> String {
    let methods = construct.args.iter().skip(1);
    let count = methods.len();
    CodeBuilder::objc()
        .line(&format!("+ ({}){}", return_type, construct.arg_at(0)))
        .block_with_close("{", "}", |b| {
            b.block_with_close("return @[", "];", |b| {
                methods.enumerate().fold(b, |b, (i, method)| {
                    let separator = if i + 1 < count { "," } else { "" };
                    b.line(&format!("[self {}]{}", method, separator))
                })
            })
        })
        .build()
}

/// Substitution rules for every construct [`ObjcRenderer`] emits.
///
/// Modern targets get Display P3 colours and lightweight generics; the
/// legacy target gets sRGB colours and a plain `NSArray`.
pub fn substitutions() -> SubstitutionTable {
    SubstitutionTable::new()
        .rule(COLOR_ACCESSOR, TargetMode::Modern, |c| {
            color_accessor(c, "colorWithDisplayP3Red")
        })
        .rule(COLOR_ACCESSOR, TargetMode::Legacy, |c| {
            color_accessor(c, "colorWithRed")
        })
        .rule(ALL_COLORS_DECLARATION, TargetMode::Modern, |c| {
            format!("+ (NSArray<UIColor *> *){};", c.arg_at(0))
        })
        .rule(ALL_COLORS_DECLARATION, TargetMode::Legacy, |c| {
            format!("+ (NSArray *){};", c.arg_at(0))
        })
        .rule(ALL_COLORS_DEFINITION, TargetMode::Modern, |c| {
            all_colors_accessor(c, "NSArray<UIColor *> *")
        })
        .rule(ALL_COLORS_DEFINITION, TargetMode::Legacy, |c| {
            all_colors_accessor(c, "NSArray *")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("say \"hi\"\n"), "say \\\"hi\\\"\\n");
        assert_eq!(escape("C:\\path"), "C:\\\\path");
    }

    #[test]
    fn test_escape_control_characters() {
        assert_eq!(escape("a\rb"), "a\\rb");
        assert_eq!(escape("nul\u{0}1"), "nul\\0001");
        assert_eq!(escape("\u{7f}"), "\\177");
        assert_eq!(escape("\u{85}"), "\\302\\205");
        assert_eq!(escape("caf\u{e9}"), "caf\u{e9}");
    }

    #[test]
    fn test_color_accessor_modern_and_legacy() {
        let table = substitutions();
        let construct = Construct::new(COLOR_ACCESSOR).args(["tintColor", "1.000", "0.533", "0.000", "1.000"]);

        assert_eq!(
            table.resolve(&construct, TargetMode::Modern).unwrap(),
            "+ (UIColor *)tintColor\n\
             {\n    \
             return [UIColor colorWithDisplayP3Red:1.000 green:0.533 blue:0.000 alpha:1.000];\n\
             }\n"
        );
        assert!(
            table
                .resolve(&construct, TargetMode::Legacy)
                .unwrap()
                .contains("[UIColor colorWithRed:1.000 green:0.533 blue:0.000 alpha:1.000]")
        );
    }

    #[test]
    fn test_all_colors_accessor() {
        let table = substitutions();
        let construct = Construct::new(ALL_COLORS_DEFINITION).args(["allColors", "aColor", "bColor"]);

        assert_eq!(
            table.resolve(&construct, TargetMode::Legacy).unwrap(),
            "+ (NSArray *)allColors\n\
             {\n    \
             return @[\n        \
             [self aColor],\n        \
             [self bColor]\n    \
             ];\n\
             }\n"
        );
    }

    #[test]
    fn test_constant_name() {
        assert_eq!(
            ObjcRenderer::constant_name("ACMEWidget", "cellIdentifier"),
            "ACMEWidgetCellIdentifier"
        );
    }
}
