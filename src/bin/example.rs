//! FEA Static Example - Portal frame with a rigid roof link

use anyhow::Result;
use fea_static::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== FEA Static Example: Portal Frame ===\n");

    // W12x26 (approximate properties)
    let section = Section::new(0.00494, 8.49e-5, 7.2e-6, 1.25e-7);
    let steel = Material::steel();

    //     N3 ======== N4      (rigid link for wind)
    //     |          |
    //     |          |
    //     N1        N2
    //   Fixed     Fixed
    let height = 4.0;
    let span = 6.0;

    let mut model = Model::new();
    let n1 = model.add_node(Node::new(0.0, 0.0, 0.0).with_label("N1"))?;
    let n2 = model.add_node(Node::new(span, 0.0, 0.0).with_label("N2"))?;
    let n3 = model.add_node(Node::new(0.0, height, 0.0).with_label("N3"))?;
    let n4 = model.add_node(Node::new(span, height, 0.0).with_label("N4"))?;

    model.add_element(FrameElement::new(n1, n3, steel, section).with_label("Col1"))?;
    model.add_element(FrameElement::new(n2, n4, steel, section).with_label("Col2"))?;
    let beam = model.add_element(FrameElement::new(n3, n4, steel, section).with_label("Beam"))?;

    model.set_constraint(n1, Constraint::fixed())?;
    model.set_constraint(n2, Constraint::fixed())?;

    let dead = LoadCase::dead("Dead");
    let wind = LoadCase::new("Wind X", LoadType::Wind);

    // 20 kN/m downward on the beam
    model.add_element_load(beam, ElementLoad::uniform(LoadDirection::FY, -20_000.0, dead.clone()))?;
    model.add_nodal_load(n3, NodalLoad::force(15_000.0, 0.0, 0.0, wind.clone()))?;

    // The roof acts as a rigid diaphragm under wind only
    model.add_rigid_element(
        RigidElement::new(vec![n3, n4])
            .for_load_type(LoadType::Wind)
            .with_label("Roof"),
    )?;

    model.solve(&AnalysisOptions::linear().with_statics_check())?;

    for case in [&dead, &wind] {
        println!("--- Load case {} ---", case);
        for (i, node) in model.nodes().iter().enumerate() {
            let d = model.node_displacement(i, case)?;
            println!(
                "  {:<3} dx = {:>10.4} mm  dy = {:>10.4} mm  rz = {:>10.6} rad",
                node.label.as_deref().unwrap_or("-"),
                d.dx * 1000.0,
                d.dy * 1000.0,
                d.rz
            );
        }
        for support in [n1, n2] {
            let r = model.support_reaction(support, case)?;
            println!(
                "  R{}: fx = {:>10.2} kN  fy = {:>10.2} kN  mz = {:>10.2} kNm",
                support + 1,
                r.fx / 1000.0,
                r.fy / 1000.0,
                r.mz / 1000.0
            );
        }

        let residual = model.equilibrium_residual(case)?;
        println!(
            "  equilibrium residual: force {:.3e}, moment {:.3e}",
            residual.force_magnitude(),
            residual.moment_magnitude()
        );

        let summary = model.summary(case)?;
        println!("{}\n", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
