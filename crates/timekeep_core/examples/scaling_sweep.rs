use std::thread;
use std::time::Duration;

use timekeep_core::{
    worker_file_name, BenchmarkTimerArray, IterationTimer, ParallelTimerArray, WorkerId,
};

const TOTAL_ITERATIONS: u32 = 48;
const ITERATION_COST: Duration = Duration::from_millis(2);

fn main() -> timekeep_core::Result<()> {
    let root = tempfile::tempdir().expect("temporary directory");
    let mut sweep = BenchmarkTimerArray::default();

    for workers in [1u32, 2, 4] {
        let dir = root.path().join(format!("{workers}cpus"));
        std::fs::create_dir_all(&dir).expect("run directory");

        // each worker measures and dumps its own share of the work
        let handles: Vec<_> = (0..workers)
            .map(|rank| {
                let dir = dir.clone();
                thread::spawn(move || -> timekeep_core::Result<()> {
                    let mut timer = IterationTimer::new(format!("rank {rank}"), "sleep solver");
                    timer.start();
                    for _ in 0..TOTAL_ITERATIONS / workers {
                        timer.time_iter(|| thread::sleep(ITERATION_COST));
                    }
                    timer.stop()?;
                    timer.dump(dir.join(worker_file_name("rank_", WorkerId(rank))?))
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker thread panicked")?;
        }

        sweep.push(ParallelTimerArray::from_dir(&dir)?);
    }

    let efficiencies = sweep.compute_efficiencies()?;
    let speedups = sweep.compute_speedups()?;
    println!(
        "{:>8} {:>12} {:>12} {:>9} {:>11}",
        "workers", "wall (s)", "cpu (s)", "speed-up", "efficiency"
    );
    for ((run, speedup), efficiency) in sweep.iter().zip(speedups).zip(efficiencies) {
        println!(
            "{:>8} {:>12.4} {:>12.4} {:>9.2} {:>11.3}",
            run.n_cpus(),
            run.total_time()?,
            run.total_cpu_time()?,
            speedup,
            efficiency
        );
    }

    Ok(())
}
