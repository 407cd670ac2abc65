// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plain-text bill of materials.

use std::io::{self, Write};

use bom_lite_engine::{BomOutput, PartKey};

/// One BOM line, padded to the longest label and material of the run.
fn write_line<W: Write>(
    out: &mut W,
    indent: &str,
    count: &str,
    part: &PartKey,
    output: &BomOutput,
) -> io::Result<()> {
    let [x, y, z] = &part.dimensions;
    write!(
        out,
        "{indent}{count} {label:<lw$}  Material: {material:<mw$}  [x:{x},y:{y},z:{z}]",
        label = part.label,
        material = part.material,
        lw = output.longest_label,
        mw = output.longest_material,
    )?;
    if part.optional {
        write!(out, "  (optional)")?;
    }
    writeln!(out)
}

fn ratio(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}x")
    } else {
        format!("{value:.2}x")
    }
}

pub fn write_text<W: Write>(out: &mut W, output: &BomOutput, diagnostics: bool) -> io::Result<()> {
    writeln!(out, "Bill of materials")?;
    for (part, count) in output.parts.iter() {
        write_line(out, "", &format!("{count}x"), part, output)?;
    }

    if !output.assemblies.is_empty() {
        writeln!(out)?;
        writeln!(out, "Assemblies")?;
        for (assembly, count) in output.assemblies.iter() {
            write_line(out, "", &format!("{count}x"), assembly, output)?;
            let Some(children) = output.composition.get(assembly) else {
                continue;
            };
            for (child, _) in children.iter() {
                if let Some(per) = output.parts_per_assembly(assembly, child) {
                    write_line(out, "    ", &ratio(per), child, output)?;
                }
            }
        }
    }

    let varying: Vec<&PartKey> = output
        .parts
        .keys()
        .filter(|part| output.has_variants(part))
        .collect();
    if !varying.is_empty() {
        writeln!(out)?;
        writeln!(out, "Volume variants")?;
        for part in varying {
            writeln!(out, "{part}")?;
            if let Some(volumes) = output.variants.get(part) {
                for (volume, count) in volumes.iter() {
                    writeln!(out, "    {count}x volume {volume}")?;
                }
            }
        }
    }

    if diagnostics && !output.diagnostics.is_empty() {
        writeln!(out)?;
        writeln!(out, "Diagnostics")?;
        for diagnostic in &output.diagnostics {
            writeln!(out, "[{:?}] {}", diagnostic.severity, diagnostic.message)?;
        }
    }

    Ok(())
}
