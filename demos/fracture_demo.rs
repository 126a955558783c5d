//! Complete fracture workflow demonstration for voronoi_fracture

use voronoi_fracture::*;

fn main() -> Result<()> {
    println!("=== voronoi_fracture Complete Demo ===\n");

    // Step 1: Build a block to break
    println!("Step 1: Building tetrahedral block...");
    let mesh = TetMesh::grid(6, 0.5);
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Tetrahedra: {}", mesh.tetrahedron_count());
    println!("  Volume: {:.3}", mesh.volume());

    // Step 2: Configure the pass
    println!("\nStep 2: Configuring fracture...");
    let config = FractureConfigBuilder::new()
        .rng_seed(12345)
        .seed_count(8)?
        .path_window(3)?
        .energy_damping(0.05)?
        .build()?;
    println!("  Seeds: {} ({})", config.seed_count, config.seed_strategy.name());
    println!("  Path window: {}", config.path_window);
    println!("  Execution: {:?}", config.execution);

    // Step 3: Strike the block
    println!("\nStep 3: Computing fracture...");
    let (_, triangle) = mesh.boundary_faces()[0];
    let impact = ImpactEvent::new(200.0, triangle);
    println!("  Impact on triangle {:?} with energy {}", triangle, impact.energy);
    let fracture = Fracture::compute(config, &mesh, Some(impact))?;

    if let Some(relaxation) = fracture.relaxation() {
        println!(
            "  Lloyd: {} iterations (converged: {})",
            relaxation.iterations, relaxation.converged
        );
    }
    println!("  Initial seeds: {:?}", fracture.initial_seeds());
    println!("  Final seeds:   {:?}", fracture.seeds());

    // Step 4: Inspect the fragments
    println!("\nStep 4: Fragments:");
    let split = fracture.split();
    println!("  Split points: {}", split.split_points.len());
    println!("  Cut pieces: {}", split.sub_tetrahedra.len());
    if split.skipped_tetrahedra > 0 {
        println!("  Skipped tetrahedra: {}", split.skipped_tetrahedra);
    }

    let mut total_volume = 0.0;
    for (region, fragment) in fracture.fragments().iter().enumerate() {
        let volume = fragment.volume();
        total_volume += volume;
        let hull = fragment
            .collision_hull()
            .map(|(vertices, _)| vertices.len())
            .unwrap_or(0);
        println!(
            "  Fragment {}: {} vertices, {} triangles, volume {:.3}, hull {} vertices",
            region,
            fragment.vertex_count(),
            fragment.triangle_count(),
            volume,
            hull
        );
    }
    println!("  Total volume: {:.3} (block {:.3})", total_volume, mesh.volume());

    // Step 5: Spatial query
    println!("\nStep 5: Spatial queries:");
    let position = DVec3::splat(1.5);
    if let Some(region) = fracture.find_region_at(position) {
        println!("  Position {:?} -> Fragment {}", position, region);
    }

    // Step 6: Render buffers
    println!("\nStep 6: Generating render meshes...");
    let meshes: Vec<MeshData> = fracture.fragments().iter().map(FragmentMesh::to_mesh_data).collect();
    let vertices: usize = meshes.iter().map(MeshData::vertex_count).sum();
    let triangles: usize = meshes.iter().map(MeshData::triangle_count).sum();
    println!("  Vertices: {}", vertices);
    println!("  Triangles: {}", triangles);

    // Memory estimate
    let mem = meshes
        .iter()
        .map(|m| m.positions.len() * 12 + m.normals.len() * 12 + m.indices.len() * 4)
        .sum::<usize>() as f32
        / 1024.0
        / 1024.0;
    println!("  Memory: {:.2} MB", mem);

    println!("\n=== Demo Complete ===");
    Ok(())
}
