use anyhow::Result;

#[cfg(target_os = "windows")]
mod windows_impl {
    use anyhow::{Context, Result};

    use dshowsrc_backend_com::DshowDriver;
    use dshowsrc_core::pixel_format::{FourCC, PixelFormat};

    pub fn main_body() -> Result<()> {
        tracing_subscriber::fmt::init();

        println!("=== dshowsrc DirectShow Device Probe ===");

        let driver = DshowDriver::new().context("Failed to initialize DirectShow")?;

        let devices = driver.list_devices()?;
        if devices.is_empty() {
            anyhow::bail!("No video capture devices found!");
        }

        println!("Found {} devices:", devices.len());
        for (i, dev) in devices.iter().enumerate() {
            println!("  [{}] {}\n      {}", i, dev.name, dev.id);
        }

        let target = &devices[0];
        println!("\nProbing capabilities of: {}", target.name);

        let filter = driver
            .open_device(&target.id)
            .context("Failed to open device")?;
        let probed = driver.capture_caps(&filter)?;

        for (s, pmt) in probed.caps.iter().zip(&probed.pin_media_types) {
            println!(
                "  {}\n      default {}x{} @ {} fps",
                s, pmt.default_width, pmt.default_height, pmt.default_fps
            );
        }

        let dv_decoder = driver.find_video_transform(
            PixelFormat::Known(FourCC::DVSD),
            PixelFormat::Known(FourCC::I420),
            Some("ffdshow"),
        )?;
        println!(
            "\nDV -> I420 decoder available: {}",
            if dv_decoder.is_some() { "yes" } else { "no" }
        );

        Ok(())
    }
}

fn main() -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        windows_impl::main_body()
    }
    #[cfg(not(target_os = "windows"))]
    {
        println!("This example is only available on Windows.");
        Ok(())
    }
}
