use core::iter;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Size},
    pixelcolor::{IntoStorage, Rgb565},
    primitives::Rectangle,
    Pixel,
};

use crate::{DisplayError, Ili9341, Interface, Result};

impl<IFACE, RESET> OriginDimensions for Ili9341<IFACE, RESET> {
    fn size(&self) -> Size {
        Size::new(self.width() as u32, self.height() as u32)
    }
}

impl<IFACE, RESET> DrawTarget for Ili9341<IFACE, RESET>
where
    IFACE: Interface,
{
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();

        self.start_write()?;
        let result = pixels
            .into_iter()
            .filter(|Pixel(point, _)| bounds.contains(*point))
            .try_for_each(|Pixel(point, color)| {
                self.set_addr_window(point.x as u16, point.y as u16, 1, 1)?;
                self.write_pixels(iter::once(color.into_storage()))
            });
        let ended = self.end_write();
        result?;
        ended
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result {
        let area = area.intersection(&self.bounding_box());
        let Size { width, height } = area.size;
        if width == 0 || height == 0 {
            return Ok(());
        }

        let count = width as usize * height as usize;
        self.draw_raw_iter(
            area.top_left.x as u16,
            area.top_left.y as u16,
            width as u16,
            height as u16,
            iter::repeat(color.into_storage()).take(count),
        )
    }
}
