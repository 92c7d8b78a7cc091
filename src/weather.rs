//! `benri weather` handlers.

use benri_core::{App, AppError};
use benri_weather::{RegionForecast, WeatherService};

use crate::commands::WeatherCommand;

pub async fn run(app: &App, command: &WeatherCommand) -> Result<(), AppError> {
    let service = WeatherService::from_config(&app.config().weather, &app.weather_db_path())?;

    match command {
        WeatherCommand::Regions { offline } => {
            let regions = if *offline {
                service.cached_regions()?
            } else {
                service.sync_regions().await?
            };

            if regions.is_empty() {
                eprintln!("No regions cached yet. Run `benri weather regions` while online.");
            }
            for region in regions {
                println!("{}  {}", region.id, region.name);
            }
        }
        WeatherCommand::Show { region_id, refresh } => {
            let forecast = if *refresh {
                service.refresh_forecast(region_id).await?
            } else {
                service.forecast(region_id).await?
            };
            print_forecast(&forecast);
        }
    }

    Ok(())
}

fn print_forecast(forecast: &RegionForecast) {
    println!(
        "{} ({}) [{}]",
        forecast.region_name,
        forecast.region_id,
        forecast.source.description()
    );
    for area in &forecast.areas {
        println!("{}: {}", area.area_name, area.weather);
    }
}
