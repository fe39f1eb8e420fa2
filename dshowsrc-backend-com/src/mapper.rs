use windows::Win32::Media::DirectShow::IFilterMapper2;
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER};
use windows_core::BOOL;

use dshowsrc_core::builder::FilterQuery;
use dshowsrc_core::error::Result;
use dshowsrc_core::traits::FilterMapper;

use crate::com::{hresult_to_dshow_error, win_guid, CLSID_FILTER_MAPPER2};
use crate::moniker::{ComMoniker, MonikerIter};

/// The filter mapper (`IFilterMapper2`).
#[derive(Debug, Clone)]
pub struct FilterMapper2(pub IFilterMapper2);

impl FilterMapper2 {
    pub fn new() -> Result<Self> {
        let inner: IFilterMapper2 =
            unsafe { CoCreateInstance(&CLSID_FILTER_MAPPER2, None, CLSCTX_INPROC_SERVER) }
                .map_err(hresult_to_dshow_error)?;
        Ok(Self(inner))
    }
}

impl FilterMapper for FilterMapper2 {
    type Moniker = ComMoniker;
    type Monikers = MonikerIter;

    fn matching_filters(&self, query: &FilterQuery) -> Result<MonikerIter> {
        let input = query.input_types().map(|g| win_guid(&g));
        let output = query.output_types().map(|g| win_guid(&g));
        let mut enum_moniker = None;

        unsafe {
            self.0.EnumMatchingFilters(
                &mut enum_moniker,
                0,
                BOOL::from(false),
                query.min_merit,
                BOOL::from(true),
                1,
                input.as_ptr(),
                std::ptr::null(),
                std::ptr::null(),
                BOOL::from(false),
                BOOL::from(true),
                1,
                output.as_ptr(),
                std::ptr::null(),
                std::ptr::null(),
            )
        }
        .map_err(hresult_to_dshow_error)?;

        Ok(MonikerIter::new(enum_moniker))
    }
}
