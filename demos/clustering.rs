//! K-means, K-means++, K-medoids, hierarchical and DBSCAN on a small 2D dataset.
//!
//! Run with `RUST_LOG=clustra=debug` to see per-iteration events.

use clustra::{Dbscan, Hierarchical, Init, Kmeans, Kmedoids, Linkage, Point};
use tracing_subscriber::EnvFilter;

fn print_clusters(title: &str, clusters: &[Vec<Point>]) {
    println!("=== {title} ===");
    for (i, members) in clusters.iter().enumerate() {
        println!("  cluster {i}: {members:?}");
    }
    println!();
}

fn main() -> clustra::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let data: Vec<Point> = vec![
        vec![1.0, 1.0],
        vec![1.5, 2.0],
        vec![3.0, 4.0],
        vec![5.0, 7.0],
        vec![3.5, 5.0],
        vec![4.5, 5.0],
        vec![3.5, 4.5],
    ];

    // --- K-means (k=2) from fixed centroids ---
    let fit = Kmeans::new(2)
        .with_centroids(vec![vec![1.0, 1.0], vec![5.0, 7.0]])
        .fit(&data)?;
    print_clusters("K-means (k=2, fixed centroids)", &fit.members(&data));

    // --- K-means++ (k=2) ---
    let fit = Kmeans::new(2)
        .with_init(Init::PlusPlus)
        .with_seed(42)
        .fit(&data)?;
    print_clusters("K-means++ (k=2)", &fit.members(&data));

    // --- K-medoids++ (k=2) ---
    let fit = Kmedoids::new(2)
        .with_init(Init::PlusPlus)
        .with_seed(42)
        .fit(&data)?;
    println!("medoids: {:?}", fit.medoids);
    print_clusters("K-medoids++ (k=2)", &fit.members(&data));

    // --- Hierarchical (k=2, single linkage) ---
    let fit = Hierarchical::new(2, Linkage::Single).fit(&data)?;
    print_clusters("Hierarchical (k=2, single linkage)", &fit.members(&data));

    // --- DBSCAN (eps=1.0, min_pts=2); last cluster is noise ---
    let fit = Dbscan::new(1.0, 2).fit(&data)?;
    print_clusters("DBSCAN (eps=1.0, min_pts=2)", &fit.members(&data));

    Ok(())
}
