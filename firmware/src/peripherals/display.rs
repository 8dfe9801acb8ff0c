//! Display control module for PineTime

use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26, SPI2},
    spim::Spim,
};
use embassy_time::Delay;
use mipidsi::{models::ST7789, Builder, Orientation};
use pinetime_watchface::ui::{self, Binder, LCD_H, LCD_W};

type Lcd = mipidsi::Display<
    SPIInterface<Spim<'static, SPI2>, Output<'static, P0_18>, Output<'static, P0_25>>,
    ST7789,
    Output<'static, P0_26>,
>;

pub struct Display {
    lcd: Lcd,
}

impl Display {
    /// Configure display settings on boot
    pub fn init(
        spim: Spim<'static, SPI2>,
        cs_pin: Output<'static, P0_25>,
        dc_pin: Output<'static, P0_18>,
        rst_pin: Output<'static, P0_26>,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc_pin, cs_pin))
            .with_display_size(LCD_W as u16, LCD_H as u16)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst_pin))
            .map_err(|_| Error::Init)?;
        Ok(Self { lcd })
    }

    /// Redraw the clock face from the binder
    pub fn draw(&mut self, binder: &Binder) -> Result<(), Error> {
        ui::draw(binder, &mut self.lcd).map_err(|_| Error::Draw)
    }

    pub fn sleep(&mut self) -> Result<(), Error> {
        self.lcd.sleep(&mut Delay).map_err(|_| Error::Draw)
    }

    pub fn wake(&mut self) -> Result<(), Error> {
        self.lcd.wake(&mut Delay).map_err(|_| Error::Draw)
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    Init,
    Draw,
}
