//! K-means on a simple 2D dataset.

use lloyd::Kmeans;

fn main() {
    // Two well-separated groups in 2D.
    let data: Vec<Vec<f32>> = vec![
        vec![1.0, 2.0],
        vec![1.5, 1.8],
        vec![5.0, 8.0],
        vec![8.0, 8.0],
        vec![1.0, 0.6],
        vec![9.0, 11.0],
    ];

    let kmeans = Kmeans::new(2);
    let fit = kmeans.fit(&data).unwrap();

    for (i, label) in fit.labels.iter().enumerate() {
        println!("Point {} is in cluster {}", i, label);
    }

    println!();
    for (c, centroid) in fit.centroids.iter().enumerate() {
        println!(
            "Cluster {} centroid: ({:.2}, {:.2})",
            c, centroid[0], centroid[1]
        );
    }
    println!(
        "Converged: {} after {} iterations (inertia {:.3})",
        fit.converged, fit.n_iter, fit.inertia
    );
}
