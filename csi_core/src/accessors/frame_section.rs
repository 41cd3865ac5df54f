//! # Frame Section Properties
//!
//! Prismatic shapes (rectangle, circle, I, pipe) reference a material by
//! name; nonprismatic sections instead reference other frame sections, one
//! start/end pair per segment. The `Get*` calls report an import file name
//! in slot 1, which is always empty for sections defined by dimensions and
//! is dropped here.

use super::{check_reported_count, name_list, read_info, with_info, Definitions};
use crate::engine::{Call, Dispatch, Interface};
use crate::enums::FrameSectionType;
use crate::errors::ApiResult;
use crate::values::sections::NonPrismaticArrays;
use crate::values::{CircleSection, FrameModifier, ISection, NonPrismaticSection, PipeSection, RectangleSection};

pub struct FrameSection<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> FrameSection<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        FrameSection { engine }
    }

    pub fn name_list_of(&self, section_type: FrameSectionType) -> ApiResult<Vec<String>> {
        name_list(self.engine, Interface::PropFrame, Some(section_type.code()))
    }

    pub fn section_type(&self, name: &str) -> ApiResult<FrameSectionType> {
        let mut reply = Call::new(Interface::PropFrame, "GetTypeOAPI")
            .arg(name)
            .out()
            .invoke(self.engine)?;
        FrameSectionType::from_code(reply.i32(1)?)
    }

    pub fn rectangle(&self, name: &str) -> ApiResult<RectangleSection> {
        let mut reply = Call::new(Interface::PropFrame, "GetRectangle")
            .arg(name)
            .outs(7)
            .invoke(self.engine)?;
        Ok(RectangleSection {
            material: reply.string(2)?,
            depth: reply.f64(3)?,
            width: reply.f64(4)?,
            info: read_info(&mut reply, 5)?,
        })
    }

    pub fn set_rectangle(&self, name: &str, section: &RectangleSection) -> ApiResult<()> {
        let call = Call::new(Interface::PropFrame, "SetRectangle")
            .arg(name)
            .arg(&section.material)
            .arg(section.depth)
            .arg(section.width);
        with_info(call, &section.info).invoke(self.engine)?;
        Ok(())
    }

    pub fn circle(&self, name: &str) -> ApiResult<CircleSection> {
        let mut reply = Call::new(Interface::PropFrame, "GetCircle")
            .arg(name)
            .outs(6)
            .invoke(self.engine)?;
        Ok(CircleSection {
            material: reply.string(2)?,
            diameter: reply.f64(3)?,
            info: read_info(&mut reply, 4)?,
        })
    }

    pub fn set_circle(&self, name: &str, section: &CircleSection) -> ApiResult<()> {
        let call = Call::new(Interface::PropFrame, "SetCircle")
            .arg(name)
            .arg(&section.material)
            .arg(section.diameter);
        with_info(call, &section.info).invoke(self.engine)?;
        Ok(())
    }

    pub fn i_section(&self, name: &str) -> ApiResult<ISection> {
        let mut reply = Call::new(Interface::PropFrame, "GetISection")
            .arg(name)
            .outs(11)
            .invoke(self.engine)?;
        Ok(ISection {
            material: reply.string(2)?,
            depth: reply.f64(3)?,
            top_flange_width: reply.f64(4)?,
            top_flange_thickness: reply.f64(5)?,
            web_thickness: reply.f64(6)?,
            bottom_flange_width: reply.f64(7)?,
            bottom_flange_thickness: reply.f64(8)?,
            info: read_info(&mut reply, 9)?,
        })
    }

    pub fn set_i_section(&self, name: &str, section: &ISection) -> ApiResult<()> {
        let call = Call::new(Interface::PropFrame, "SetISection")
            .arg(name)
            .arg(&section.material)
            .arg(section.depth)
            .arg(section.top_flange_width)
            .arg(section.top_flange_thickness)
            .arg(section.web_thickness)
            .arg(section.bottom_flange_width)
            .arg(section.bottom_flange_thickness);
        with_info(call, &section.info).invoke(self.engine)?;
        Ok(())
    }

    pub fn pipe(&self, name: &str) -> ApiResult<PipeSection> {
        let mut reply = Call::new(Interface::PropFrame, "GetPipe")
            .arg(name)
            .outs(7)
            .invoke(self.engine)?;
        Ok(PipeSection {
            material: reply.string(2)?,
            outside_diameter: reply.f64(3)?,
            wall_thickness: reply.f64(4)?,
            info: read_info(&mut reply, 5)?,
        })
    }

    pub fn set_pipe(&self, name: &str, section: &PipeSection) -> ApiResult<()> {
        let call = Call::new(Interface::PropFrame, "SetPipe")
            .arg(name)
            .arg(&section.material)
            .arg(section.outside_diameter)
            .arg(section.wall_thickness);
        with_info(call, &section.info).invoke(self.engine)?;
        Ok(())
    }

    /// Segments of a nonprismatic section. The six returned arrays must
    /// agree in length with each other and with the reported count.
    pub fn non_prismatic(&self, name: &str) -> ApiResult<NonPrismaticSection> {
        let mut reply = Call::new(Interface::PropFrame, "GetNonPrismatic")
            .arg(name)
            .outs(10)
            .invoke(self.engine)?;
        let n = reply.i32(1)?;
        let arrays = NonPrismaticArrays {
            start_sections: reply.strings(2)?,
            end_sections: reply.strings(3)?,
            lengths: reply.doubles(4)?,
            length_types: reply.ints(5)?,
            ei33: reply.ints(6)?,
            ei22: reply.ints(7)?,
        };
        check_reported_count("start_sections", n, arrays.start_sections.len())?;
        Ok(NonPrismaticSection {
            segments: arrays.into_segments()?,
            info: read_info(&mut reply, 8)?,
        })
    }

    pub fn set_non_prismatic(&self, name: &str, section: &NonPrismaticSection) -> ApiResult<()> {
        let arrays = NonPrismaticArrays::from_segments(&section.segments);
        let call = Call::new(Interface::PropFrame, "SetNonPrismatic")
            .arg(name)
            .arg(section.segments.len() as i32)
            .arg(arrays.start_sections)
            .arg(arrays.end_sections)
            .arg(arrays.lengths)
            .arg(arrays.length_types)
            .arg(arrays.ei33)
            .arg(arrays.ei22);
        with_info(call, &section.info).invoke(self.engine)?;
        Ok(())
    }

    pub fn modifiers(&self, name: &str) -> ApiResult<FrameModifier> {
        let mut reply = Call::new(Interface::PropFrame, "GetModifiers")
            .arg(name)
            .out()
            .invoke(self.engine)?;
        FrameModifier::from_array(&reply.doubles(1)?)
    }

    pub fn set_modifiers(&self, name: &str, modifiers: &FrameModifier) -> ApiResult<()> {
        Call::new(Interface::PropFrame, "SetModifiers")
            .arg(name)
            .arg(modifiers.to_array())
            .invoke(self.engine)?;
        Ok(())
    }
}

impl Definitions for FrameSection<'_> {
    const INTERFACE: Interface = Interface::PropFrame;

    fn engine(&self) -> &dyn Dispatch {
        self.engine
    }
}
