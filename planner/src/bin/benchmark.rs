use std::fs::read_dir;

#[cfg(not(feature = "prof"))]
pub fn main() {
    println!("benchmarks not supported -- enable 'prof' crate feature")
}

#[derive(Debug)]
struct Result {
    time: f32,
    distance: f64,
    unreached: usize,
    failed: usize,
}

fn get_instance_files(dir: &str) -> Vec<std::path::PathBuf> {
    let mut filenames = read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|e| e.as_os_str().to_string_lossy().ends_with(".json"))
        .collect::<Vec<_>>();
    filenames.sort();
    filenames
}

#[cfg(feature = "prof")]
pub fn main() {
    use medroute_planner::{
        astar, dijkstra, route::Planner, total_distance, DistanceGraph,
    };
    use medroute_structs::scenario::Scenario;
    use std::{fs::read_to_string, time::Instant};

    env_logger::init();
    let dir = std::env::args().nth(1).unwrap_or_else(|| "scenarios".to_string());
    let solvers: [(&str, Planner); 2] = [
        ("a-star", astar::optimize_routes),
        ("dijkstra", dijkstra::optimize_routes),
    ];

    println!("---------------------------");
    println!("medroute planner benchmarking");
    println!("---------------------------");
    println!();
    println!(
        "  solvers: {}",
        solvers
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    let instance_files = get_instance_files(&dir);
    let mut instances = Vec::new();
    let mut results: Vec<Vec<Result>> = Vec::new();

    println!("# RUNNING {} INSTANCES", instance_files.len());
    for filename in instance_files.iter() {
        let _p = hprof::enter("instance");
        let scenario: Scenario = {
            let _p = hprof::enter("read");
            serde_json::from_str(&read_to_string(filename).unwrap()).unwrap()
        };
        let origins = scenario.selection.origin_names();
        let tasks = scenario.selection.task_names();
        println!(
            " * instance {} with {} origins {} tasks",
            filename.display(),
            origins.len(),
            tasks.len()
        );
        let graph = DistanceGraph::build(&scenario.distances).unwrap();

        results.push(Vec::new());
        for (solver_name, solver_fn) in &solvers {
            println!("   - solving with: \"{}\"", solver_name);
            let _p0 = hprof::enter("plan");
            let t0 = Instant::now();
            let routes = solver_fn(&graph, &origins, &tasks);
            let time = t0.elapsed().as_secs_f32();
            results.last_mut().unwrap().push(Result {
                time,
                distance: total_distance(&routes),
                unreached: routes
                    .iter()
                    .filter_map(|r| r.as_ref().ok())
                    .map(|r| r.unreached.len())
                    .sum(),
                failed: routes.iter().filter(|r| r.is_err()).count(),
            });
        }
        instances.push((filename.clone(), origins.len(), tasks.len()));
    }
    println!();
    println!("# PROFILER");
    hprof::profiler().print_timing();
    println!();

    println!("# RESULTS");

    use std::io::Write;
    let table = Vec::new();
    let mut tablewriter = tabwriter::TabWriter::new(table);
    write!(&mut tablewriter, "filename\torg\ttsk").unwrap();
    for (solver_name, _) in &solvers {
        write!(&mut tablewriter, "\t|\t{}\t\t\t", solver_name).unwrap();
    }
    writeln!(&mut tablewriter).unwrap();

    write!(&mut tablewriter, "\t\t").unwrap();
    for _ in &solvers {
        write!(&mut tablewriter, "\t|\ttime\tkm\tunr\tfail").unwrap();
    }
    writeln!(&mut tablewriter).unwrap();

    write!(&mut tablewriter, "---\t---\t---").unwrap();
    for _ in &solvers {
        write!(&mut tablewriter, "\t\t---\t---\t---\t---").unwrap();
    }
    writeln!(&mut tablewriter).unwrap();

    for ((filename, origins, tasks), solver_results) in instances.iter().zip(results.iter()) {
        write!(
            &mut tablewriter,
            "{}\t{}\t{}",
            filename.file_stem().unwrap().to_string_lossy(),
            origins,
            tasks
        )
        .unwrap();
        for result in solver_results.iter() {
            write!(
                &mut tablewriter,
                "\t|\t{:.4}\t{:.2}\t{}\t{}",
                result.time, result.distance, result.unreached, result.failed
            )
            .unwrap();
        }
        writeln!(&mut tablewriter).unwrap();
    }

    let written = String::from_utf8(tablewriter.into_inner().unwrap()).unwrap();
    println!("{}", written);
}
