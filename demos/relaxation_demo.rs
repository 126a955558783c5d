//! Seed relaxation and distance field demonstration
//!
//! Compares random seeds before and after Lloyd relaxation, then shows how
//! the curvature correction changes region sizes.

use voronoi_fracture::*;

fn print_sizes(label: &str, sizes: &[usize]) {
    let min = sizes.iter().min().copied().unwrap_or(0);
    let max = sizes.iter().max().copied().unwrap_or(0);
    println!("  {}: {:?} (min {}, max {})", label, sizes, min, max);
}

fn main() -> Result<()> {
    println!("=== Lloyd Relaxation Demo ===\n");

    let mesh = TetMesh::grid(8, 0.25);
    let points = mesh.vertices();
    println!("Point cloud: {} vertices", points.len());

    let initial = random_seeds(points.len(), 6, 7)?;
    println!("Initial seeds: {:?}\n", initial);

    let regions = relax_seeds_with_options(
        points,
        &initial,
        LloydOptions {
            max_iterations: 1,
            ..Default::default()
        },
    )?;
    print_sizes("After 1 iteration", &regions.region_sizes());

    for strategy in [ExecutionStrategy::Sequential, ExecutionStrategy::Parallel] {
        let start = std::time::Instant::now();
        let relaxed = relax_seeds_with_options(
            points,
            &initial,
            LloydOptions {
                strategy,
                ..Default::default()
            },
        )?;
        println!(
            "\n{:?}: {} iterations, converged: {}, {:?}",
            strategy,
            relaxed.iterations,
            relaxed.converged,
            start.elapsed()
        );
        println!("  Seeds: {:?}", relaxed.seeds);
        print_sizes("Relaxed", &relaxed.region_sizes());
    }

    println!("\n=== Distance Field ===\n");
    let relaxed = relax_seeds(points, &initial)?;
    let graph = mesh.to_graph();
    for window in [0, 2, 3, 5] {
        let field = compute_distances(&graph, &relaxed.seeds, window);
        let mut sizes = vec![0usize; relaxed.seeds.len()];
        for region in field.region_assignment(&relaxed.seeds).into_iter().flatten() {
            sizes[region] += 1;
        }
        let farthest = field
            .iter()
            .map(|(_, entry)| entry.distance)
            .fold(0.0, f64::max);
        print_sizes(&format!("k={} (max distance {:.3})", window, farthest), &sizes);
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
