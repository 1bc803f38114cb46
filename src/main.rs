use std::error::Error;

use clap::Parser;
use log::info;
use thiserror::Error;


mod config;
mod domain;
mod scenario;
mod simulator;

use config::{Args, VehicleArg};
use domain::{Position, Vehicle};
use scenario::ScenarioGenerator;
use simulator::Simulator;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .init();

    let mut simulator = Simulator::new(args.width, args.height, args.config());

    for vehicle in vehicles(&args)? {
        if !simulator.grid().contains(vehicle.initial_position()) {
            return Err(CliError::OutsideGrid {
                name: vehicle.name().to_string(),
                position: vehicle.initial_position(),
            }
            .into());
        }
        simulator.try_add_vehicle(vehicle)?;
    }

    if simulator.vehicle_count() == 0 {
        return Err(CliError::NoVehicles.into());
    }

    println!(
        "You have created a field of {} x {}",
        simulator.grid().width(),
        simulator.grid().height()
    );
    println!("\nYour current list of cars are:");
    for line in simulator.initial_listing() {
        println!("{line}");
    }

    let steps = simulator.run();
    info!("simulation finished after {steps} steps");

    println!("\nAfter simulation, the result is:");
    print!("{}", simulator.report());

    Ok(())
}

fn vehicles(args: &Args) -> Result<Vec<Vehicle>, Box<dyn Error>> {
    let mut vehicles: Vec<Vehicle> = args.vehicles.iter().map(|VehicleArg(v)| v.clone()).collect();

    if let Some(count) = args.random {
        let seed = args.seed.unwrap_or_else(rand::random);
        info!("generating {count} vehicles with seed {seed}");
        vehicles.extend(ScenarioGenerator::new(seed).generate(
            args.width,
            args.height,
            count,
            args.max_commands,
        )?);
    }

    Ok(vehicles)
}

#[derive(Error, Debug)]
enum CliError {
    #[error("vehicle {name} starts at {position}, outside the grid")]
    OutsideGrid { name: String, position: Position },
    #[error("no vehicles given, use --vehicle or --random")]
    NoVehicles,
}
